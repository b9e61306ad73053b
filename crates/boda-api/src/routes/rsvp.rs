//! Routes for the RSVP flow.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use boda_core::error::DomainError;
use boda_rsvp::application::controller::{RsvpController, RsvpSnapshot};
use boda_rsvp::domain::form::RsvpField;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::FlowCreated;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for PUT /{id}/fields.
#[derive(Debug, Deserialize)]
pub struct SetFieldRequest {
    /// Field to update.
    pub field: RsvpField,
    /// Raw user input.
    pub value: String,
}

type StepResponse = (StatusCode, Json<RsvpSnapshot>);

/// Turns a local validation failure into 422 with the updated state; other
/// errors pass through.
fn with_validation_state(
    result: Result<(), DomainError>,
    controller: &RsvpController,
) -> Result<StepResponse, ApiError> {
    match result {
        Ok(()) => Ok((StatusCode::OK, Json(controller.snapshot()))),
        Err(DomainError::Validation(_)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(controller.snapshot()),
        )),
        Err(e) => Err(e.into()),
    }
}

/// POST /
#[instrument(skip(state))]
async fn create(
    State(state): State<AppState>,
) -> (StatusCode, Json<FlowCreated<RsvpSnapshot>>) {
    let controller = RsvpController::new(
        Arc::clone(&state.rsvp),
        Arc::clone(&state.submitter),
        Arc::clone(&state.clock),
    );
    let snapshot = controller.snapshot();
    let (flow_id, _) = state.rsvp_flows.insert(controller);
    info!(%flow_id, "rsvp flow created");
    (
        StatusCode::CREATED,
        Json(FlowCreated {
            flow_id,
            state: snapshot,
        }),
    )
}

/// GET /{id}
#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RsvpSnapshot>, ApiError> {
    let flow = state.rsvp_flows.get(id)?;
    let controller = flow.lock().await;
    Ok(Json(controller.snapshot()))
}

/// PUT /{id}/fields
#[instrument(skip(state, request), fields(field = ?request.field))]
async fn set_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetFieldRequest>,
) -> Result<Json<RsvpSnapshot>, ApiError> {
    let flow = state.rsvp_flows.get(id)?;
    let mut controller = flow.lock().await;
    controller.set_field(request.field, &request.value)?;
    Ok(Json(controller.snapshot()))
}

/// POST /{id}/advance
#[instrument(skip(state))]
async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StepResponse, ApiError> {
    let flow = state.rsvp_flows.get(id)?;
    let mut controller = flow.lock().await;
    let result = controller.advance().map(|_| ());
    with_validation_state(result, &controller)
}

/// POST /{id}/retreat
#[instrument(skip(state))]
async fn retreat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RsvpSnapshot>, ApiError> {
    let flow = state.rsvp_flows.get(id)?;
    let mut controller = flow.lock().await;
    controller.retreat()?;
    Ok(Json(controller.snapshot()))
}

/// POST /{id}/submit
///
/// The flow lock is released while the request is in flight, so a second
/// submit sees the in-flight flag and gets 409. Sending and recording the
/// outcome run on their own task, which finishes even if the client goes
/// away and this handler is dropped.
#[instrument(skip(state))]
async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StepResponse, ApiError> {
    let flow = state.rsvp_flows.get(id)?;

    let pending = {
        let mut controller = flow.lock().await;
        match controller.begin_submit() {
            Ok(pending) => pending,
            Err(e) => return with_validation_state(Err(e), &controller),
        }
    };

    info!(%id, "sending rsvp");
    let task = tokio::spawn(async move {
        let result = pending.send().await;
        let mut controller = flow.lock().await;
        let outcome = controller.finish_submit(result).map(|_| ());
        (outcome, controller.snapshot())
    });

    let (outcome, snapshot) = task.await.map_err(|e| {
        DomainError::Transport(format!("rsvp submission task ended early: {e}"))
    })?;
    outcome?;
    Ok((StatusCode::OK, Json(snapshot)))
}

/// DELETE /{id}
#[instrument(skip(state))]
async fn discard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.rsvp_flows.remove(id)?;
    info!(%id, "rsvp flow discarded");
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the RSVP flow.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", get(show).delete(discard))
        .route("/{id}/fields", put(set_field))
        .route("/{id}/advance", post(advance))
        .route("/{id}/retreat", post(retreat))
        .route("/{id}/submit", post(submit))
}
