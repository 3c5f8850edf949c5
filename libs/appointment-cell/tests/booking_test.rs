mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc, Weekday};

use appointment_cell::models::{AppointmentError, CreateAppointmentRequest};
use appointment_cell::services::{AppointmentBookingService, ConflictDetectionService};
use shared_utils::test_utils::{next_weekday_at, TestConfig};

use common::{seeded_state, STRANGE, WHO};

fn request(doctor_id: i64, start_time: chrono::DateTime<Utc>, duration_minutes: i64) -> CreateAppointmentRequest {
    CreateAppointmentRequest { doctor_id, start_time, duration_minutes }
}

#[tokio::test]
async fn test_strange_monday_scenario() {
    let state = seeded_state(TestConfig::default()).await;
    let service = AppointmentBookingService::new(&state);
    let monday_2pm = next_weekday_at(Weekday::Mon, 14, 0);

    let booked = service.book_appointment(request(STRANGE, monday_2pm, 45)).await.unwrap();
    assert_eq!(booked.doctor_id, STRANGE);
    assert_eq!(booked.start_time, monday_2pm);
    assert_eq!(booked.end_time, monday_2pm + Duration::minutes(45));

    let overlapping = service
        .book_appointment(request(STRANGE, monday_2pm + Duration::minutes(20), 45))
        .await;
    assert_matches!(overlapping, Err(AppointmentError::SlotConflict));

    let midnight = next_weekday_at(Weekday::Mon, 0, 0);
    assert_matches!(
        service.book_appointment(request(STRANGE, midnight, 45)).await,
        Err(AppointmentError::OutsideWorkingHours)
    );
}

#[tokio::test]
async fn test_same_slot_twice_conflicts() {
    let state = seeded_state(TestConfig::default()).await;
    let service = AppointmentBookingService::new(&state);
    let start = next_weekday_at(Weekday::Wed, 10, 0);

    service.book_appointment(request(WHO, start, 30)).await.unwrap();
    assert_matches!(
        service.book_appointment(request(WHO, start, 30)).await,
        Err(AppointmentError::SlotConflict)
    );

    // Another doctor's calendar is independent.
    service.book_appointment(request(STRANGE, start, 30)).await.unwrap();
}

#[tokio::test]
async fn test_touching_appointments_do_not_conflict() {
    let state = seeded_state(TestConfig::default()).await;
    let service = AppointmentBookingService::new(&state);
    let start = next_weekday_at(Weekday::Thu, 11, 0);

    service.book_appointment(request(STRANGE, start, 30)).await.unwrap();
    service.book_appointment(request(STRANGE, start + Duration::minutes(30), 30)).await.unwrap();
    service.book_appointment(request(STRANGE, start - Duration::minutes(15), 15)).await.unwrap();

    let conflicts = ConflictDetectionService::new(Arc::clone(&state.store));
    assert!(conflicts.has_conflict(STRANGE, start + Duration::minutes(29), start + Duration::minutes(31)).await.unwrap());
    assert!(!conflicts.has_conflict(STRANGE, start + Duration::minutes(60), start + Duration::minutes(75)).await.unwrap());
}

#[tokio::test]
async fn test_unknown_doctor() {
    let state = seeded_state(TestConfig::default()).await;
    let service = AppointmentBookingService::new(&state);
    let start = next_weekday_at(Weekday::Tue, 14, 0);

    assert_matches!(
        service.book_appointment(request(-1, start, 45)).await,
        Err(AppointmentError::DoctorNotFound)
    );
    assert_matches!(
        service.list_appointments(-1, start, start + Duration::hours(4)).await,
        Err(AppointmentError::DoctorNotFound)
    );
}

#[tokio::test]
async fn test_past_start_is_rejected() {
    let state = seeded_state(TestConfig::default()).await;
    let service = AppointmentBookingService::new(&state);

    let result = service
        .book_appointment(request(STRANGE, Utc::now() - Duration::days(1), 45))
        .await;
    assert_matches!(result, Err(AppointmentError::ValidationError(errors)) => {
        assert_eq!(errors.messages("start_time"), ["Start time must be in the future."]);
    });
}

#[tokio::test]
async fn test_only_start_is_checked_against_working_hours() {
    let state = seeded_state(TestConfig::default()).await;
    let service = AppointmentBookingService::new(&state);
    let late_start = next_weekday_at(Weekday::Fri, 16, 45);

    // Runs until 17:45, past Strange's 17:00 end of day.
    let booked = service.book_appointment(request(STRANGE, late_start, 60)).await.unwrap();
    assert_eq!(booked.end_time, next_weekday_at(Weekday::Fri, 17, 45));
}

#[tokio::test]
async fn test_end_check_when_enforced() {
    let config = TestConfig { enforce_end_within_hours: true, ..TestConfig::default() };
    let state = seeded_state(config).await;
    let service = AppointmentBookingService::new(&state);

    assert_matches!(
        service.book_appointment(request(STRANGE, next_weekday_at(Weekday::Fri, 16, 45), 60)).await,
        Err(AppointmentError::OutsideWorkingHours)
    );

    // Ending exactly at work_end is still inside the window.
    service
        .book_appointment(request(STRANGE, next_weekday_at(Weekday::Fri, 16, 0), 60))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_booking_is_visible_and_listing_is_idempotent() {
    let state = seeded_state(TestConfig::default()).await;
    let service = AppointmentBookingService::new(&state);
    let start = next_weekday_at(Weekday::Tue, 14, 15);

    let booked = service.book_appointment(request(STRANGE, start, 45)).await.unwrap();
    // Another doctor's appointment in the same window stays out of the listing.
    service.book_appointment(request(WHO, start, 45)).await.unwrap();

    let window_start = start - Duration::hours(2);
    let window_end = window_start + Duration::hours(4);

    let first = service.list_appointments(STRANGE, window_start, window_end).await.unwrap();
    let second = service.list_appointments(STRANGE, window_start, window_end).await.unwrap();
    assert_eq!(first, vec![booked]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_listing_requires_full_containment() {
    let state = seeded_state(TestConfig::default()).await;
    let service = AppointmentBookingService::new(&state);
    let start = next_weekday_at(Weekday::Tue, 10, 0);

    service.book_appointment(request(STRANGE, start, 60)).await.unwrap();

    // Window overlaps the appointment but cuts its end.
    let partial = service
        .list_appointments(STRANGE, start, start + Duration::minutes(30))
        .await
        .unwrap();
    assert!(partial.is_empty());

    // Window bounds are inclusive.
    let exact = service
        .list_appointments(STRANGE, start, start + Duration::minutes(60))
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);
}

#[tokio::test]
async fn test_inverted_window() {
    let state = seeded_state(TestConfig::default()).await;
    let service = AppointmentBookingService::new(&state);
    let start = next_weekday_at(Weekday::Tue, 10, 0);

    assert_matches!(
        service.list_appointments(STRANGE, start, start - Duration::hours(1)).await,
        Err(AppointmentError::InvalidWindow)
    );
    assert_matches!(
        service.list_appointments(-1, start, start).await,
        Err(AppointmentError::InvalidWindow)
    );
}

#[tokio::test]
async fn test_concurrent_bookings_admit_one() {
    let state = seeded_state(TestConfig::default()).await;
    let start = next_weekday_at(Weekday::Wed, 15, 0);

    let attempts: Vec<_> = (0..8)
        .map(|offset| {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                AppointmentBookingService::new(&state)
                    .book_appointment(request(STRANGE, start + Duration::minutes(offset), 30))
                    .await
            })
        })
        .collect();

    let mut booked = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => booked += 1,
            Err(err) => assert_matches!(err, AppointmentError::SlotConflict),
        }
    }
    assert_eq!(booked, 1);
}
