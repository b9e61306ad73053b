//! Music suggestion submission.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use boda_core::error::DomainError;
use boda_forms::music::{MusicController, MusicForm, MusicSnapshot};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /
#[instrument(skip(state, form))]
async fn submit(
    State(state): State<AppState>,
    Json(form): Json<MusicForm>,
) -> Result<(StatusCode, Json<MusicSnapshot>), ApiError> {
    let mut controller = MusicController::new(
        Arc::clone(&state.music),
        Arc::clone(&state.submitter),
        Arc::clone(&state.clock),
    );
    *controller.form_mut() = form;

    match controller.submit().await {
        Ok(()) => Ok((StatusCode::OK, Json(controller.snapshot()))),
        Err(DomainError::Validation(_)) => {
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(controller.snapshot())))
        }
        Err(e) => Err(e.into()),
    }
}

/// Returns the router for the music suggestion form.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit))
}
