use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use doctor_cell::services::directory::is_working;
use doctor_cell::DoctorService;
use shared_database::SchedulingStore;
use shared_models::validation::FieldErrors;
use shared_models::{Appointment, Doctor, DoctorId, NewAppointment};
use shared_utils::{AppState, DoctorLocks};

use crate::models::{AppointmentError, CreateAppointmentRequest};
use crate::services::conflict::ConflictDetectionService;
use crate::validation::START_IN_PAST;

pub struct AppointmentBookingService {
    store: Arc<dyn SchedulingStore>,
    doctor_service: DoctorService,
    conflict_service: ConflictDetectionService,
    doctor_locks: Arc<DoctorLocks>,
    enforce_end_within_hours: bool,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        let store = Arc::clone(&state.store);

        Self {
            doctor_service: DoctorService::with_store(Arc::clone(&store)),
            conflict_service: ConflictDetectionService::new(Arc::clone(&store)),
            doctor_locks: Arc::clone(&state.doctor_locks),
            enforce_end_within_hours: state.config.enforce_end_within_hours,
            store,
        }
    }

    /// Book `request` if the doctor exists, is working at the start instant
    /// and has nothing overlapping. Nothing is written on any failure.
    pub async fn book_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!("Booking appointment for doctor {} at {} ({} minutes)",
              request.doctor_id, request.start_time, request.duration_minutes);

        if request.start_time <= Utc::now() {
            return Err(AppointmentError::ValidationError(
                FieldErrors::single("start_time", START_IN_PAST),
            ));
        }

        let doctor = self.doctor_service.get_doctor(request.doctor_id).await?;
        let end_time = appointment_end(request.start_time, request.duration_minutes)?;

        if !self.within_working_hours(&doctor, request.start_time, end_time) {
            warn!("Doctor {} not working at {}", doctor.id, request.start_time);
            return Err(AppointmentError::OutsideWorkingHours);
        }

        // Conflict check and insert must not interleave with another booking
        // for the same doctor.
        let _guard = self.doctor_locks.lock(doctor.id).await;

        if self.conflict_service.has_conflict(doctor.id, request.start_time, end_time).await? {
            return Err(AppointmentError::SlotConflict);
        }

        let appointment = self.store
            .insert_appointment(NewAppointment {
                doctor_id: doctor.id,
                start_time: request.start_time,
                end_time,
            })
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!("Appointment {} booked with doctor {} from {} to {}",
              appointment.id, doctor.name, appointment.start_time, appointment.end_time);

        Ok(appointment)
    }

    /// Appointments of `doctor_id` fully contained in the window.
    pub async fn list_appointments(
        &self,
        doctor_id: DoctorId,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments for doctor {} between {} and {}",
               doctor_id, window_start, window_end);

        if window_start >= window_end {
            return Err(AppointmentError::InvalidWindow);
        }

        let doctor = self.doctor_service.get_doctor(doctor_id).await?;

        self.store
            .find_within(doctor.id, window_start, window_end)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    fn within_working_hours(
        &self,
        doctor: &Doctor,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> bool {
        if !is_working(doctor, &start_time) {
            return false;
        }

        // By default only the start counts; an appointment may run past work_end.
        !self.enforce_end_within_hours
            || (end_time.date_naive() == start_time.date_naive() && is_working(doctor, &end_time))
    }
}

fn appointment_end(
    start_time: DateTime<Utc>,
    duration_minutes: i64,
) -> Result<DateTime<Utc>, AppointmentError> {
    TimeDelta::try_minutes(duration_minutes)
        .and_then(|duration| start_time.checked_add_signed(duration))
        .ok_or_else(|| {
            AppointmentError::ValidationError(FieldErrors::single("duration", "Duration is too long."))
        })
}
