//! Outbound form submission abstraction.
//!
//! Every form on the site posts a JSON payload to a remote form-script
//! endpoint. The endpoint is an opaque HTTP sink: the only things a flow
//! looks at are the status code and, for the quiz, a `message` field in the
//! response body.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use crate::error::DomainError;

/// What came back from the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, if it parsed as JSON.
    pub body: Option<serde_json::Value>,
}

impl SubmitResponse {
    /// A 200 response with no body.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: 200,
            body: None,
        }
    }

    /// A response with the given status and no body.
    #[must_use]
    pub fn with_status(status: u16) -> Self {
        Self { status, body: None }
    }

    /// A 200 response carrying `body`.
    #[must_use]
    pub fn ok_with_body(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `message` field of a JSON object body, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body.as_ref()?.get("message")?.as_str()
    }
}

/// Posts a serialized form payload to a remote endpoint.
#[async_trait]
pub trait FormSubmitter: Send + Sync {
    /// Sends `payload` to `endpoint`.
    ///
    /// A response with any status is `Ok`; callers decide what a non-OK
    /// status means.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Transport` if no response was received.
    async fn submit(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
    ) -> Result<SubmitResponse, DomainError>;
}

/// What a flow does when the request fails before any response arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailurePolicy {
    /// Show the user a success state anyway and log a warning. The
    /// submission may not have been recorded.
    #[default]
    MaskAsSuccess,
    /// Show an error notice and let the user retry.
    Surface,
}

/// Formats `at` the way submission payloads carry their `fecha` field
/// (`2026-01-15T10:00:00.000Z`).
#[must_use]
pub fn payload_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
