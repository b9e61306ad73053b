//! Static configuration for the single-step forms.

use boda_core::submission::TransportFailurePolicy;
use serde::Deserialize;

/// Placeholder form-script URL; deployments override it.
pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/DEPLOYMENT_ID/exec";

/// Settings for the pre-wedding form.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrebodaSettings {
    /// Endpoint receiving pre-wedding answers.
    pub endpoint: String,
    /// What to do when the answer cannot be sent at all.
    pub transport_failure: TransportFailurePolicy,
}

impl Default for PrebodaSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            transport_failure: TransportFailurePolicy::MaskAsSuccess,
        }
    }
}

/// Settings for the music suggestion form.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MusicSettings {
    /// Endpoint receiving suggestions.
    pub endpoint: String,
    /// How long the thank-you message stays up.
    pub confirmation_ms: u64,
}

impl Default for MusicSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            confirmation_ms: 3000,
        }
    }
}
