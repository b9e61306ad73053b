//! Gallery photo sequence.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use boda_ui::photos::Photo;

use crate::state::AppState;

/// GET /
async fn list_photos(State(state): State<AppState>) -> Json<Vec<Photo>> {
    Json(state.gallery.as_ref().clone())
}

/// Returns the router for the gallery.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_photos))
}
