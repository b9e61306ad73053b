//! Liveness probe.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Flows currently held in memory.
#[derive(Debug, Serialize)]
pub struct LiveFlows {
    /// Open RSVP flows.
    pub rsvp: usize,
    /// Open quiz flows.
    pub quiz: usize,
}

/// Body of GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server answers.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// In-memory flow counts.
    pub flows: LiveFlows,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        flows: LiveFlows {
            rsvp: state.rsvp_flows.len(),
            quiz: state.quiz_flows.len(),
        },
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
