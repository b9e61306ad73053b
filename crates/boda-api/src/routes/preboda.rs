//! Pre-wedding party form submission.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use boda_core::error::DomainError;
use boda_forms::preboda::{PrebodaController, PrebodaForm, PrebodaOutcome, PrebodaSnapshot};
use serde::Serialize;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct PrebodaResponse {
    /// How the submission ended; absent when the form did not validate.
    pub outcome: Option<PrebodaOutcome>,
    /// Form state after the attempt.
    pub state: PrebodaSnapshot,
}

/// POST /
#[instrument(skip(state, form))]
async fn submit(
    State(state): State<AppState>,
    Json(form): Json<PrebodaForm>,
) -> Result<(StatusCode, Json<PrebodaResponse>), ApiError> {
    let mut controller = PrebodaController::new(
        Arc::clone(&state.preboda),
        Arc::clone(&state.submitter),
        Arc::clone(&state.clock),
    );
    *controller.form_mut() = form;

    match controller.submit().await {
        Ok(outcome) => Ok((
            StatusCode::OK,
            Json(PrebodaResponse {
                outcome: Some(outcome),
                state: controller.snapshot(),
            }),
        )),
        Err(DomainError::Validation(_)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(PrebodaResponse {
                outcome: None,
                state: controller.snapshot(),
            }),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Returns the router for the pre-wedding form.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit))
}
