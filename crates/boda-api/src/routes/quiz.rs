//! Routes for the quiz.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use boda_core::error::DomainError;
use boda_core::store::{KeyValueStore, PrefixedStore};
use boda_core::validation::is_blank;
use boda_quiz::application::flow::{QuizFlow, QuizSnapshot, QuizSubmissionOutcome};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::FlowCreated;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateQuizRequest {
    /// Stable id of the visitor's browser; scopes the "already played" flag.
    pub visitor_id: String,
}

/// Request body for POST /{id}/answer.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Index of the chosen option.
    pub option: usize,
}

/// Response body for POST /{id}/answer.
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    /// `false` if the question was already closed.
    pub accepted: bool,
    /// State after the answer.
    pub state: QuizSnapshot,
}

/// Request body for POST /{id}/submit.
#[derive(Debug, Deserialize)]
pub struct SubmitResultRequest {
    /// Player name.
    pub name: String,
    /// Player email.
    pub email: String,
}

/// Response body for POST /{id}/submit.
#[derive(Debug, Serialize)]
pub struct SubmitResultResponse {
    /// How the submission ended.
    pub outcome: QuizSubmissionOutcome,
    /// State after the submission.
    pub state: QuizSnapshot,
}

/// POST /
#[instrument(skip(state, request))]
async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateQuizRequest>,
) -> Result<(StatusCode, Json<FlowCreated<QuizSnapshot>>), ApiError> {
    if is_blank(&request.visitor_id) {
        return Err(DomainError::Validation("visitor_id is required".into()).into());
    }
    let store: Arc<dyn KeyValueStore> = Arc::new(PrefixedStore::new(
        Arc::clone(&state.local_store),
        format!("visitor:{}", request.visitor_id.trim()),
    ));
    let flow = QuizFlow::new(
        Arc::clone(&state.quiz),
        store,
        Arc::clone(&state.submitter),
        Arc::clone(&state.clock),
    )?;
    let snapshot = flow.snapshot();
    let (flow_id, _) = state.quiz_flows.insert(flow);
    info!(%flow_id, phase = ?snapshot.phase, "quiz flow created");
    Ok((
        StatusCode::CREATED,
        Json(FlowCreated {
            flow_id,
            state: snapshot,
        }),
    ))
}

/// GET /{id}
#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuizSnapshot>, ApiError> {
    let flow = state.quiz_flows.get(id)?;
    let flow = flow.lock().await;
    Ok(Json(flow.snapshot()))
}

/// POST /{id}/start
#[instrument(skip(state))]
async fn start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuizSnapshot>, ApiError> {
    let flow = state.quiz_flows.get(id)?;
    let mut flow = flow.lock().await;
    flow.start()?;
    Ok(Json(flow.snapshot()))
}

/// POST /{id}/answer
#[instrument(skip(state, request), fields(option = request.option))]
async fn answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let flow = state.quiz_flows.get(id)?;
    let mut flow = flow.lock().await;
    let accepted = flow.answer(request.option)?;
    Ok(Json(AnswerResponse {
        accepted,
        state: flow.snapshot(),
    }))
}

/// POST /{id}/submit
///
/// Releases the flow lock while the result is in flight. The send and its
/// bookkeeping run on their own task so a dropped request still lowers the
/// in-flight flag.
#[instrument(skip(state, request))]
async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitResultRequest>,
) -> Result<Json<SubmitResultResponse>, ApiError> {
    let flow = state.quiz_flows.get(id)?;

    let pending = flow
        .lock()
        .await
        .begin_submission(&request.name, &request.email)?;

    info!(%id, "sending quiz result");
    let task = tokio::spawn(async move {
        let result = pending.send().await;
        let mut flow = flow.lock().await;
        let outcome = flow.finish_submission(result);
        (outcome, flow.snapshot())
    });

    let (outcome, state) = task.await.map_err(|e| {
        DomainError::Transport(format!("quiz submission task ended early: {e}"))
    })?;
    Ok(Json(SubmitResultResponse {
        outcome: outcome?,
        state,
    }))
}

/// DELETE /{id}
#[instrument(skip(state))]
async fn discard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let flow = state.quiz_flows.remove(id)?;
    flow.lock().await.shutdown();
    info!(%id, "quiz flow discarded");
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the quiz.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", get(show).delete(discard))
        .route("/{id}/start", post(start))
        .route("/{id}/answer", post(answer))
        .route("/{id}/submit", post(submit))
}
