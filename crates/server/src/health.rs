//! Health surface shared by the dispatcher and the customer gateway.
//!
//! The services carry no hard dependencies, so the check never goes
//! degraded; it reports which optional capabilities were configured at
//! bootstrap so operators can tell a keyless deployment from a broken one.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub llm: bool,
    pub email: bool,
    pub queue: bool,
    pub object_store: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub capabilities: Capabilities,
    pub checked_at: String,
}

#[derive(Clone)]
pub struct HealthState {
    pub service: &'static str,
    pub capabilities: Capabilities,
}

pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ready",
        service: state.service,
        capabilities: state.capabilities,
        checked_at: Utc::now().to_rfc3339(),
    })
}
