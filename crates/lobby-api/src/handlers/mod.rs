//! HTTP API handlers — exposes the registry as JSON.

pub mod servers;
pub mod status;

use std::time::Instant;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use lobby_registry::SharedRegistry;

#[derive(Clone)]
pub struct ApiState {
    pub registry: SharedRegistry,
    /// Use the first X-Forwarded-For hop as the registering server's IP.
    pub trust_forwarded_for: bool,
    pub started_at: Instant,
}

impl ApiState {
    pub fn new(registry: SharedRegistry, trust_forwarded_for: bool) -> Self {
        Self {
            registry,
            trust_forwarded_for,
            started_at: Instant::now(),
        }
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
}

/// Parse a port path segment.
fn parse_port(raw: &str) -> Result<u16, ApiError> {
    raw.parse::<u16>()
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "Invalid port"))
}

// Re-export handler functions for use in router setup.
pub use servers::{
    handle_get_players, handle_get_server, handle_list_servers, handle_register_server,
};
pub use status::handle_status;
