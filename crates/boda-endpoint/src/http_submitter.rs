//! `reqwest` implementation of the `FormSubmitter` trait.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use boda_core::error::DomainError;
use boda_core::submission::{FormSubmitter, SubmitResponse};

/// Content type sent with every submission. A `text/plain` body keeps the
/// request "simple" so the form-script host never sees a CORS pre-flight.
pub const SUBMISSION_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// Submits forms over HTTP, following redirects.
#[derive(Debug, Clone)]
pub struct HttpFormSubmitter {
    client: Client,
}

impl HttpFormSubmitter {
    /// Creates a submitter with a default `reqwest` client.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Creates a submitter around an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFormSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormSubmitter for HttpFormSubmitter {
    async fn submit(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
    ) -> Result<SubmitResponse, DomainError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| DomainError::Validation(format!("payload serialization failed: {e}")))?;

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, SUBMISSION_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        // Form-script hosts answer with HTML on some errors; only JSON is kept.
        let body = serde_json::from_str(&text).ok();

        tracing::debug!(endpoint, status, has_body = body.is_some(), "form submitted");

        Ok(SubmitResponse { status, body })
    }
}
