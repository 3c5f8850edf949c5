use chrono::NaiveTime;
use serde::Serialize;
use thiserror::Error;

use shared_models::error::AppError;
use shared_models::{Doctor, NewDoctor};

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Init already done.")]
    AlreadyInitialized,

    #[error("Doctor not found.")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::AlreadyInitialized => AppError::BadRequest(err.to_string()),
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

/// Directory entry as exposed over HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorResponse {
    pub id: i64,
    pub name: String,
    pub work_start: String,
    pub work_end: String,
    pub work_days: Vec<u8>,
}

impl From<Doctor> for DoctorResponse {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name,
            work_start: doctor.work_start.format("%H:%M").to_string(),
            work_end: doctor.work_end.format("%H:%M").to_string(),
            work_days: doctor.work_days,
        }
    }
}

// Evaluated at compile time, so an out-of-range hour fails the build.
const fn on_the_hour(hour: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(time) => time,
        None => panic!("hour out of range"),
    }
}

const STRANGE_HOURS: (NaiveTime, NaiveTime) = (on_the_hour(9), on_the_hour(17));
const WHO_HOURS: (NaiveTime, NaiveTime) = (on_the_hour(8), on_the_hour(16));

/// Doctors seeded by `InitializeDoctors`, Monday to Friday.
pub fn default_roster() -> Vec<NewDoctor> {
    let weekdays = vec![1, 2, 3, 4, 5];

    vec![
        NewDoctor {
            name: "Strange".to_string(),
            work_start: STRANGE_HOURS.0,
            work_end: STRANGE_HOURS.1,
            work_days: weekdays.clone(),
        },
        NewDoctor {
            name: "Who".to_string(),
            work_start: WHO_HOURS.0,
            work_end: WHO_HOURS.1,
            work_days: weekdays,
        },
    ]
}
