use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::MemoryStore;

use crate::state::AppState;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub availability_rollover: bool,
    pub availability_horizon_days: u32,
    pub enforce_end_within_hours: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            availability_rollover: false,
            availability_horizon_days: 14,
            enforce_end_within_hours: false,
        }
    }
}

impl TestConfig {
    pub fn with_supabase(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            availability_rollover: self.availability_rollover,
            availability_horizon_days: self.availability_horizon_days,
            enforce_end_within_hours: self.enforce_end_within_hours,
            ..AppConfig::default()
        }
    }

    /// Router state backed by a fresh in-memory store.
    pub fn to_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config(), Arc::new(MemoryStore::new())))
    }
}

/// The next `weekday` strictly after today's date, at `hour:minute` UTC.
pub fn next_weekday_at(weekday: Weekday, hour: u32, minute: u32) -> DateTime<Utc> {
    next_weekday_after(Utc::now(), weekday, hour, minute)
}

pub fn next_weekday_after(
    from: DateTime<Utc>,
    weekday: Weekday,
    hour: u32,
    minute: u32,
) -> DateTime<Utc> {
    let today = from.weekday().num_days_from_sunday() as i64;
    let target = weekday.num_days_from_sunday() as i64;
    let mut days_ahead = (target - today).rem_euclid(7);
    if days_ahead == 0 {
        days_ahead = 7;
    }

    let date = from.date_naive() + Duration::days(days_ahead);
    let time = NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time of day");
    Utc.from_utc_datetime(&date.and_time(time))
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn doctor_row(id: i64, name: &str, work_start: &str, work_end: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "work_start": work_start,
            "work_end": work_end,
            "work_days": [1, 2, 3, 4, 5]
        })
    }

    pub fn appointment_row(id: i64, doctor_id: i64, start_time: &str, end_time: &str) -> Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "start_time": start_time,
            "end_time": end_time
        })
    }
}
