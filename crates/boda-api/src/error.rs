//! Boda API — error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use boda_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable or the wedding config file is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The persisted flag store could not be opened.
    #[error("store error: {0}")]
    Store(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code and machine-readable code for the wrapped error.
    #[must_use]
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::InvalidState(_) => (StatusCode::CONFLICT, "invalid_state"),
            DomainError::FlowNotFound(_) => (StatusCode::NOT_FOUND, "flow_not_found"),
            DomainError::Rejected(_) => (StatusCode::BAD_GATEWAY, "submission_rejected"),
            DomainError::Transport(_) => (StatusCode::BAD_GATEWAY, "transport_error"),
            DomainError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.classify();
        if status.is_server_error() {
            warn!(%status, error, detail = %self.0, "request failed");
        }

        let body = ErrorBody {
            error,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
