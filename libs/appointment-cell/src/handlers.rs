use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_models::validation::{FieldErrors, SCHEMA_FIELD};
use shared_models::Appointment;
use shared_utils::AppState;

use crate::models::AvailableSlot;
use crate::services::{AppointmentBookingService, AvailabilitySearchService};
use crate::validation::{
    validate_availability_query, validate_create_appointment, validate_window_query,
};

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(body) = payload.map_err(|rejection| {
        AppError::ValidationError(FieldErrors::single(SCHEMA_FIELD, rejection.body_text()))
    })?;

    let request = validate_create_appointment(&body, Utc::now())
        .map_err(AppError::ValidationError)?;

    let booking_service = AppointmentBookingService::new(&state);
    let appointment = booking_service.book_appointment(request).await?;

    Ok((StatusCode::CREATED, Json(json!({
        "message": "Appointment created successfully.",
        "appointment": appointment
    }))))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let query = validate_window_query(&params).map_err(AppError::ValidationError)?;

    let booking_service = AppointmentBookingService::new(&state);
    let appointments = booking_service
        .list_appointments(query.doctor_id, query.window_start, query.window_end)
        .await?;

    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn find_available(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<AvailableSlot>, AppError> {
    let query = validate_availability_query(&params).map_err(AppError::ValidationError)?;

    let after = whole_second_at_or_after(query.after.unwrap_or_else(Utc::now));

    let search_service = AvailabilitySearchService::new(&state);
    let slot = search_service.find_first_available(after, query.doctor_id).await?;

    Ok(Json(slot))
}

// Slots are reported to the second; rounding up keeps a reported start from
// falling before the requested instant.
fn whole_second_at_or_after(instant: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = instant.trunc_subsecs(0);
    if truncated < instant {
        truncated + TimeDelta::seconds(1)
    } else {
        truncated
    }
}
