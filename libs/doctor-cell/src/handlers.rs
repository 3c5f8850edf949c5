use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::DoctorResponse;
use crate::services::doctor::DoctorService;

#[axum::debug_handler]
pub async fn initialize_db(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    doctor_service.initialize_doctors().await?;

    Ok(Json(json!({
        "message": "Database initialized with doctors."
    })))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DoctorResponse>>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors().await?;

    Ok(Json(doctors.into_iter().map(DoctorResponse::from).collect()))
}
