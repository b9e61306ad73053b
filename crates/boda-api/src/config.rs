//! Server configuration.
//!
//! Network and storage settings come from the environment. The wedding
//! itself (endpoints, dates, stops, questions, photos) comes from an
//! optional YAML file; anything the file leaves out keeps its built-in
//! value.

use std::path::PathBuf;
use std::time::Duration;

use boda_forms::settings::{MusicSettings, PrebodaSettings};
use boda_quiz::settings::QuizSettings;
use boda_rsvp::settings::RsvpSettings;
use boda_ui::photos::{Photo, default_photos};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::DEFAULT_FLOW_IDLE_TTL;

/// Default location of the persisted flag store.
pub const DEFAULT_STORE_PATH: &str = "boda-store.json";

/// Everything about the wedding the flows need.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeddingConfig {
    /// Attendance confirmation.
    pub rsvp: RsvpSettings,
    /// Trivia quiz.
    pub quiz: QuizSettings,
    /// Pre-wedding party form.
    pub preboda: PrebodaSettings,
    /// Music suggestions.
    pub music: MusicSettings,
    /// Gallery photos, in display order.
    pub gallery: Vec<Photo>,
}

impl Default for WeddingConfig {
    fn default() -> Self {
        Self {
            rsvp: RsvpSettings::default(),
            quiz: QuizSettings::default(),
            preboda: PrebodaSettings::default(),
            music: MusicSettings::default(),
            gallery: default_photos(),
        }
    }
}

impl WeddingConfig {
    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the document is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, AppError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| AppError::Config(format!("invalid wedding config: {e}")))
    }

    /// Points every form at the same endpoint.
    pub fn set_all_endpoints(&mut self, endpoint: &str) {
        endpoint.clone_into(&mut self.rsvp.endpoint);
        endpoint.clone_into(&mut self.quiz.endpoint);
        endpoint.clone_into(&mut self.preboda.endpoint);
        endpoint.clone_into(&mut self.music.endpoint);
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// JSON file backing the persisted flag store.
    pub store_path: PathBuf,
    /// Inactivity after which an RSVP or quiz flow is dropped.
    pub flow_idle_ttl: Duration,
    /// Wedding settings.
    pub wedding: WeddingConfig,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is invalid or the wedding
    /// config file cannot be read or parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let store_path = lookup("BODA_STORE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from);
        let flow_idle_ttl = match lookup("BODA_FLOW_IDLE_SECS") {
            Some(secs) => secs.parse().map(Duration::from_secs).map_err(|e| {
                AppError::Config(format!("BODA_FLOW_IDLE_SECS must be whole seconds: {e}"))
            })?,
            None => DEFAULT_FLOW_IDLE_TTL,
        };

        let mut wedding = match lookup("BODA_CONFIG") {
            Some(path) => {
                let yaml = std::fs::read_to_string(&path)
                    .map_err(|e| AppError::Config(format!("cannot read {path}: {e}")))?;
                WeddingConfig::from_yaml(&yaml)?
            }
            None => WeddingConfig::default(),
        };
        if let Some(endpoint) = lookup("BODA_FORM_ENDPOINT") {
            wedding.set_all_endpoints(&endpoint);
        }

        Ok(Self {
            host,
            port,
            store_path,
            flow_idle_ttl,
            wedding,
        })
    }

    /// `host:port`, ready to parse as a socket address.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        // Act
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        // Assert
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.store_path, PathBuf::from("boda-store.json"));
        assert_eq!(config.flow_idle_ttl, Duration::from_secs(1800));
        assert_eq!(config.wedding.gallery.len(), 9);
        assert_eq!(config.wedding.quiz.seconds_per_question, 15);
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("PORT", "http")]));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_flow_idle_ttl_reads_seconds() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("BODA_FLOW_IDLE_SECS", "90")])).unwrap();

        assert_eq!(config.flow_idle_ttl, Duration::from_secs(90));
    }

    #[test]
    fn test_invalid_flow_idle_ttl_is_a_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("BODA_FLOW_IDLE_SECS", "soon")]));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_form_endpoint_overrides_every_flow() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            "BODA_FORM_ENDPOINT",
            "https://forms.test/exec",
        )]))
        .unwrap();

        assert_eq!(config.wedding.rsvp.endpoint, "https://forms.test/exec");
        assert_eq!(config.wedding.quiz.endpoint, "https://forms.test/exec");
        assert_eq!(config.wedding.preboda.endpoint, "https://forms.test/exec");
        assert_eq!(config.wedding.music.endpoint, "https://forms.test/exec");
    }

    #[test]
    fn test_missing_config_file_is_a_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[(
            "BODA_CONFIG",
            "/nonexistent/boda.yaml",
        )]));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_yaml_overrides_only_what_it_names() {
        // Arrange
        let yaml = r"
rsvp:
  bus_stops: [Vigo]
quiz:
  seconds_per_question: 20
  transport_failure: surface
music:
  confirmation_ms: 5000
";

        // Act
        let wedding = WeddingConfig::from_yaml(yaml).unwrap();

        // Assert
        assert_eq!(wedding.rsvp.bus_stops, vec!["Vigo".to_string()]);
        assert_eq!(wedding.quiz.seconds_per_question, 20);
        assert_eq!(
            wedding.quiz.transport_failure,
            boda_core::submission::TransportFailurePolicy::Surface
        );
        assert_eq!(wedding.quiz.questions.len(), 10);
        assert_eq!(wedding.music.confirmation_ms, 5000);
        assert_eq!(wedding.gallery.len(), 9);
    }

    #[test]
    fn test_malformed_yaml_is_a_config_error() {
        let result = WeddingConfig::from_yaml("rsvp: [not, a, map]");

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
