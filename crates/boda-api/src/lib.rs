//! Boda API — HTTP surface for the wedding site flows.
//!
//! Hosts RSVP and quiz flow instances in memory, forwards the one-shot
//! forms, and serves the gallery sequence.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

/// Builds the full router over `state`.
pub fn app(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/rsvp", routes::rsvp::router())
        .nest("/api/v1/quiz", routes::quiz::router())
        .nest("/api/v1/preboda", routes::preboda::router())
        .nest("/api/v1/music", routes::music::router())
        .nest("/api/v1/gallery", routes::gallery::router())
        .with_state(state)
}
