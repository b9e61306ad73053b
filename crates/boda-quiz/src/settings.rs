//! Static configuration for the quiz.

use std::time::Duration;

use boda_core::submission::TransportFailurePolicy;
use serde::Deserialize;

use crate::domain::question::{Question, default_questions};

/// Placeholder form-script URL; deployments override it.
pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/DEPLOYMENT_ID/exec";

/// Settings for the quiz.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    /// Endpoint receiving quiz results.
    pub endpoint: String,
    /// Names shown on a perfect score.
    pub couple: String,
    /// Countdown per question.
    pub seconds_per_question: u32,
    /// Pause after an explicit answer before the next question.
    pub answer_delay_ms: u64,
    /// Pause after a timeout before the next question.
    pub timeout_delay_ms: u64,
    /// What to do when the result cannot be sent at all.
    pub transport_failure: TransportFailurePolicy,
    /// Questions in play order.
    pub questions: Vec<Question>,
}

impl QuizSettings {
    /// Pause after an explicit answer.
    #[must_use]
    pub fn answer_delay(&self) -> Duration {
        Duration::from_millis(self.answer_delay_ms)
    }

    /// Pause after a timeout.
    #[must_use]
    pub fn timeout_delay(&self) -> Duration {
        Duration::from_millis(self.timeout_delay_ms)
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            couple: "Pablo & Vega".into(),
            seconds_per_question: 15,
            answer_delay_ms: 1500,
            timeout_delay_ms: 2000,
            transport_failure: TransportFailurePolicy::MaskAsSuccess,
            questions: default_questions(),
        }
    }
}
