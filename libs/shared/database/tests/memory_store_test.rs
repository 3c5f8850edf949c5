use chrono::{Duration, NaiveTime, TimeZone, Utc};

use shared_database::{MemoryStore, SchedulingStore};
use shared_models::{NewAppointment, NewDoctor};

fn roster() -> Vec<NewDoctor> {
    ["Strange", "Who"]
        .into_iter()
        .map(|name| NewDoctor {
            name: name.to_string(),
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            work_days: vec![1, 2, 3, 4, 5],
        })
        .collect()
}

#[tokio::test]
async fn test_seed_assigns_ids_in_order_once() {
    let store = MemoryStore::new();

    let seeded = store.seed_doctors(roster()).await.unwrap().unwrap();
    assert_eq!(seeded.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(store.seed_doctors(roster()).await.unwrap().is_none());
    assert_eq!(store.count_doctors().await.unwrap(), 2);

    let listed = store.list_doctors().await.unwrap();
    assert_eq!(listed, seeded);
}

#[tokio::test]
async fn test_insert_requires_known_doctor() {
    let store = MemoryStore::new();
    let start = Utc.with_ymd_and_hms(2030, 1, 7, 14, 0, 0).unwrap();

    let result = store
        .insert_appointment(NewAppointment { doctor_id: 1, start_time: start, end_time: start + Duration::minutes(30) })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_overlap_and_containment_queries() {
    let store = MemoryStore::new();
    store.seed_doctors(roster()).await.unwrap();
    let start = Utc.with_ymd_and_hms(2030, 1, 7, 14, 0, 0).unwrap();

    let first = store
        .insert_appointment(NewAppointment { doctor_id: 1, start_time: start, end_time: start + Duration::minutes(45) })
        .await
        .unwrap();
    store
        .insert_appointment(NewAppointment { doctor_id: 2, start_time: start, end_time: start + Duration::minutes(45) })
        .await
        .unwrap();

    let overlapping = store
        .find_overlapping(1, start + Duration::minutes(20), start + Duration::minutes(65))
        .await
        .unwrap();
    assert_eq!(overlapping, vec![first.clone()]);

    let touching = store
        .find_overlapping(1, start + Duration::minutes(45), start + Duration::minutes(60))
        .await
        .unwrap();
    assert!(touching.is_empty());

    let within = store.find_within(1, start, start + Duration::minutes(45)).await.unwrap();
    assert_eq!(within, vec![first]);
    assert!(store.find_within(1, start, start + Duration::minutes(44)).await.unwrap().is_empty());
}
