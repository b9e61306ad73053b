//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Client-side validation failed; the flow keeps its state.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation is not allowed in the flow's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// No live flow instance exists for the given identifier.
    #[error("flow not found: {0}")]
    FlowNotFound(Uuid),

    /// The remote endpoint answered with a non-OK status.
    #[error("submission rejected with status {0}")]
    Rejected(u16),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The key-value store could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
}
