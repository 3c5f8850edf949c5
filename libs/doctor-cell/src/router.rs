use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_utils::AppState;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/init_db", post(handlers::initialize_db))
        .route("/doctors", get(handlers::list_doctors))
        .with_state(state)
}
