use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use doctor_cell::models::DoctorError;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::scheduling::local_timestamp;
use shared_models::validation::{FieldErrors, SCHEMA_FIELD};
use shared_models::DoctorId;

/// Length of the slot probed at each step of the availability search.
pub const SLOT_PROBE_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAppointmentRequest {
    pub doctor_id: DoctorId,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentWindowQuery {
    pub doctor_id: DoctorId,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub doctor_id: Option<DoctorId>,
    pub after: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableSlot {
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    #[serde(with = "local_timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "local_timestamp")]
    pub end_time: DateTime<Utc>,
}

/// How far the availability search may look past the starting instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchHorizon {
    /// Probe from the starting instant until the time of day reaches the
    /// doctor's end of day, then give up on that doctor.
    SameDay,
    /// Keep searching on the following days, starting each one at the
    /// doctor's start of day.
    Rollover { days: u32 },
}

impl SearchHorizon {
    pub fn from_config(config: &AppConfig) -> Self {
        if config.availability_rollover {
            SearchHorizon::Rollover { days: config.availability_horizon_days }
        } else {
            SearchHorizon::SameDay
        }
    }
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Doctor not found.")]
    DoctorNotFound,

    #[error("Doctor not available at the specified time.")]
    OutsideWorkingHours,

    #[error("The time slot is already booked.")]
    SlotConflict,

    #[error("Start time must be earlier than end time.")]
    InvalidWindow,

    #[error("No available slots.")]
    NoAvailableSlot,

    #[error("Validation error: {0}")]
    ValidationError(FieldErrors),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DoctorError> for AppointmentError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppointmentError::DoctorNotFound,
            DoctorError::DatabaseError(msg) => AppointmentError::DatabaseError(msg),
            other => AppointmentError::DatabaseError(other.to_string()),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::DoctorNotFound | AppointmentError::NoAvailableSlot => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::OutsideWorkingHours => AppError::BadRequest(err.to_string()),
            AppointmentError::SlotConflict => AppError::Conflict(err.to_string()),
            AppointmentError::InvalidWindow => {
                AppError::ValidationError(FieldErrors::single(SCHEMA_FIELD, err.to_string()))
            }
            AppointmentError::ValidationError(errors) => AppError::ValidationError(errors),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
