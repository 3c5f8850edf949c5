//! Request validation as pure functions: raw JSON or query parameters in,
//! a typed request or field-level messages out.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use shared_models::scheduling::parse_timestamp;
use shared_models::validation::{FieldErrors, SCHEMA_FIELD};

use crate::models::{AppointmentWindowQuery, AvailabilityQuery, CreateAppointmentRequest};

pub const MISSING_FIELD: &str = "Missing data for required field.";
pub const INVALID_INTEGER: &str = "Not a valid integer.";
pub const INVALID_DATETIME: &str = "Not a valid datetime.";
pub const START_IN_PAST: &str = "Start time must be in the future.";
pub const NON_POSITIVE_DURATION: &str = "Duration must be a positive number of minutes.";
pub const INVERTED_WINDOW: &str = "Start time must be earlier than end time.";
pub const INVALID_INPUT: &str = "Invalid input type.";

/// Validate a `CreateAppointment` body. `now` is the request time the start
/// must lie after.
pub fn validate_create_appointment(
    body: &Value,
    now: DateTime<Utc>,
) -> Result<CreateAppointmentRequest, FieldErrors> {
    let Some(fields) = body.as_object() else {
        return Err(FieldErrors::single(SCHEMA_FIELD, INVALID_INPUT));
    };

    let mut errors = FieldErrors::new();

    let doctor_id = required(&mut errors, fields, "doctor_id", read_integer, INVALID_INTEGER);
    let start_time = required(&mut errors, fields, "start_time", read_datetime, INVALID_DATETIME);
    let duration = required(&mut errors, fields, "duration", read_integer, INVALID_INTEGER);

    if let Some(start) = start_time {
        if start <= now {
            errors.add("start_time", START_IN_PAST);
        }
    }
    if let Some(minutes) = duration {
        if minutes <= 0 {
            errors.add("duration", NON_POSITIVE_DURATION);
        }
    }

    match (doctor_id, start_time, duration) {
        (Some(doctor_id), Some(start_time), Some(duration_minutes)) => {
            errors.into_result(CreateAppointmentRequest { doctor_id, start_time, duration_minutes })
        }
        _ => Err(errors),
    }
}

/// Validate the `ListAppointments` query string.
pub fn validate_window_query(
    params: &HashMap<String, String>,
) -> Result<AppointmentWindowQuery, FieldErrors> {
    let fields = query_fields(params);
    let mut errors = FieldErrors::new();

    let doctor_id = required(&mut errors, &fields, "doctor_id", read_integer, INVALID_INTEGER);
    let window_start = required(&mut errors, &fields, "start_time", read_datetime, INVALID_DATETIME);
    let window_end = required(&mut errors, &fields, "end_time", read_datetime, INVALID_DATETIME);

    match (doctor_id, window_start, window_end) {
        (Some(doctor_id), Some(window_start), Some(window_end)) => {
            if window_start >= window_end {
                errors.add(SCHEMA_FIELD, INVERTED_WINDOW);
            }
            errors.into_result(AppointmentWindowQuery { doctor_id, window_start, window_end })
        }
        _ => Err(errors),
    }
}

/// Validate the `FindAvailable` query string; both parameters are optional.
pub fn validate_availability_query(
    params: &HashMap<String, String>,
) -> Result<AvailabilityQuery, FieldErrors> {
    let fields = query_fields(params);
    let mut errors = FieldErrors::new();

    let doctor_id = optional(&mut errors, &fields, "doctor_id", read_integer, INVALID_INTEGER);
    let after = optional(&mut errors, &fields, "after_time", read_datetime, INVALID_DATETIME);

    errors.into_result(AvailabilityQuery { doctor_id, after })
}

fn query_fields(params: &HashMap<String, String>) -> Map<String, Value> {
    params
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect()
}

fn required<T>(
    errors: &mut FieldErrors,
    fields: &Map<String, Value>,
    name: &str,
    read: fn(&Value) -> Option<T>,
    invalid: &str,
) -> Option<T> {
    match fields.get(name) {
        None | Some(Value::Null) => {
            errors.add(name, MISSING_FIELD);
            None
        }
        Some(value) => parse_field(errors, name, value, read, invalid),
    }
}

fn optional<T>(
    errors: &mut FieldErrors,
    fields: &Map<String, Value>,
    name: &str,
    read: fn(&Value) -> Option<T>,
    invalid: &str,
) -> Option<T> {
    match fields.get(name) {
        None | Some(Value::Null) => None,
        Some(value) => parse_field(errors, name, value, read, invalid),
    }
}

fn parse_field<T>(
    errors: &mut FieldErrors,
    name: &str,
    value: &Value,
    read: fn(&Value) -> Option<T>,
    invalid: &str,
) -> Option<T> {
    let parsed = read(value);
    if parsed.is_none() {
        errors.add(name, invalid);
    }
    parsed
}

// Query parameters arrive as strings, JSON bodies may carry either form.
fn read_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn read_datetime(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_timestamp)
}
