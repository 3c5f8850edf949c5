#![allow(dead_code)]

use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use doctor_cell::DoctorService;
use shared_utils::test_utils::TestConfig;
use shared_utils::AppState;

pub const STRANGE: i64 = 1;
pub const WHO: i64 = 2;

/// State with the default roster already seeded.
pub async fn seeded_state(config: TestConfig) -> Arc<AppState> {
    let state = config.to_state();
    DoctorService::new(&state).initialize_doctors().await.unwrap();
    state
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
