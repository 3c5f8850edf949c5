use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_utils::AppState;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/appointments", post(handlers::create_appointment).get(handlers::list_appointments))
        .route("/appointments/available", get(handlers::find_available))
        .with_state(state)
}
