//! /status handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::ApiState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub servers: usize,
    pub ttl_secs: i64,
    pub uptime_secs: u64,
}

pub async fn handle_status(State(state): State<ApiState>) -> Json<StatusResponse> {
    state.registry.sweep();

    Json(StatusResponse {
        servers: state.registry.len(),
        ttl_secs: state.registry.ttl_secs(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
