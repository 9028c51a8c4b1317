//! HTTP route handlers for the agent backend.

pub mod agents;
pub mod memory;
pub mod projects;

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::ServerState;

pub const SERVICE_NAME: &str = "Kracked_Skills_Agent_Backend";

/// Health check endpoint. Reports handle presence without touching the database.
pub async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        db_connected: state.db_connected(),
    })
}

/// Treats blank strings as missing.
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
