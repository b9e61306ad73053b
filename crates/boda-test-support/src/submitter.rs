//! Test submitters — mock `FormSubmitter` implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use boda_core::error::DomainError;
use boda_core::submission::{FormSubmitter, SubmitResponse};

/// A submitter that records every call and answers from a queue of
/// prepared responses. Once the queue is drained it keeps answering with
/// the last response.
#[derive(Debug)]
pub struct RecordingSubmitter {
    responses: Mutex<VecDeque<SubmitResponse>>,
    submitted: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingSubmitter {
    /// Create a submitter that answers every call with `response`.
    #[must_use]
    pub fn new(response: SubmitResponse) -> Self {
        Self::with_responses(vec![response])
    }

    /// Create a submitter that answers calls with `responses` in order.
    ///
    /// # Panics
    ///
    /// Panics if `responses` is empty.
    #[must_use]
    pub fn with_responses(responses: Vec<SubmitResponse>) -> Self {
        assert!(
            !responses.is_empty(),
            "RecordingSubmitter needs at least one response"
        );
        Self {
            responses: Mutex::new(responses.into()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of every `(endpoint, payload)` pair submitted.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn submissions(&self) -> Vec<(String, serde_json::Value)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl FormSubmitter for RecordingSubmitter {
    async fn submit(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
    ) -> Result<SubmitResponse, DomainError> {
        self.submitted
            .lock()
            .unwrap()
            .push((endpoint.to_owned(), payload.clone()));
        let mut responses = self.responses.lock().unwrap();
        let response = if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses.front().cloned().unwrap()
        };
        Ok(response)
    }
}

/// A submitter whose requests never reach the endpoint. Useful for testing
/// network-failure paths.
#[derive(Debug, Default)]
pub struct FailingSubmitter {
    attempts: Mutex<usize>,
}

impl FailingSubmitter {
    /// Create a new failing submitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of submissions attempted.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl FormSubmitter for FailingSubmitter {
    async fn submit(
        &self,
        _endpoint: &str,
        _payload: &serde_json::Value,
    ) -> Result<SubmitResponse, DomainError> {
        *self.attempts.lock().unwrap() += 1;
        Err(DomainError::Transport("connection refused".into()))
    }
}
