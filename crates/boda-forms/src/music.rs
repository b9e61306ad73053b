//! Music suggestion form.
//!
//! Unlike the other forms, a failed request is always reported to the
//! guest; nothing is assumed recorded.

use std::sync::Arc;

use boda_core::clock::Clock;
use boda_core::error::DomainError;
use boda_core::notice::Notice;
use boda_core::submission::{FormSubmitter, payload_timestamp};
use boda_core::validation::is_blank;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::settings::MusicSettings;

/// Value of the `tipo` field for music suggestions.
pub const MUSIC_PAYLOAD_KIND: &str = "sugerencia_musica";

const MISSING_SONG_MESSAGE: &str = "Por favor, escribe el nombre de la canción";
const REJECTED_MESSAGE: &str = "Error al enviar. Inténtalo de nuevo.";
const TRANSPORT_MESSAGE: &str = "Error de conexión. Inténtalo de nuevo más tarde.";

/// What the guest has filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicForm {
    /// Song title; required.
    pub song: String,
    /// Artist, if known.
    pub artist: String,
    /// Who suggests it.
    pub name: String,
}

#[derive(Debug, Serialize)]
struct MusicPayload<'a> {
    tipo: &'static str,
    cancion: &'a str,
    artista: &'a str,
    nombre: &'a str,
    fecha: String,
}

/// Read-only view of the form, for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct MusicSnapshot {
    /// Current field values.
    pub form: MusicForm,
    /// A submission is in flight.
    pub submitting: bool,
    /// The thank-you message is showing.
    pub confirmation_visible: bool,
    /// Error from the last operation.
    pub notice: Option<Notice>,
}

/// Drives the music suggestion form.
pub struct MusicController {
    settings: Arc<MusicSettings>,
    submitter: Arc<dyn FormSubmitter>,
    clock: Arc<dyn Clock>,
    form: MusicForm,
    submitting: bool,
    submitted_at: Option<DateTime<Utc>>,
    notice: Option<Notice>,
}

impl MusicController {
    /// Starts with an empty form.
    #[must_use]
    pub fn new(
        settings: Arc<MusicSettings>,
        submitter: Arc<dyn FormSubmitter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            submitter,
            clock,
            form: MusicForm::default(),
            submitting: false,
            submitted_at: None,
            notice: None,
        }
    }

    /// Current field values.
    #[must_use]
    pub fn form(&self) -> &MusicForm {
        &self.form
    }

    /// Field values, for editing.
    pub fn form_mut(&mut self) -> &mut MusicForm {
        &mut self.form
    }

    /// Error from the last operation.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Whether the thank-you message is still up.
    #[must_use]
    pub fn is_confirmation_visible(&self) -> bool {
        let window =
            TimeDelta::milliseconds(i64::try_from(self.settings.confirmation_ms).unwrap_or(i64::MAX));
        self.submitted_at
            .is_some_and(|at| self.clock.elapsed_since(at) < window)
    }

    /// Validates and sends the suggestion; on success the form is cleared
    /// for the next one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the song is missing,
    /// `DomainError::InvalidState` while a submission is in flight,
    /// `DomainError::Rejected` for a non-OK response and the transport
    /// error unchanged.
    pub async fn submit(&mut self) -> Result<(), DomainError> {
        if self.submitting {
            return Err(DomainError::InvalidState(
                "submission already in flight".into(),
            ));
        }
        if is_blank(&self.form.song) {
            self.notice = Some(Notice::error(MISSING_SONG_MESSAGE));
            return Err(DomainError::Validation("song is required".into()));
        }
        self.notice = None;

        let payload = serde_json::to_value(MusicPayload {
            tipo: MUSIC_PAYLOAD_KIND,
            cancion: &self.form.song,
            artista: &self.form.artist,
            nombre: &self.form.name,
            fecha: payload_timestamp(self.clock.now()),
        })
        .map_err(|e| DomainError::Validation(format!("payload serialization failed: {e}")))?;

        self.submitting = true;
        info!(song = %self.form.song, "music suggestion submission started");
        let result = self.submitter.submit(&self.settings.endpoint, &payload).await;
        self.submitting = false;

        match result {
            Ok(response) if response.is_ok() => {
                info!(status = response.status, "music suggestion recorded");
                self.form = MusicForm::default();
                self.submitted_at = Some(self.clock.now());
                Ok(())
            }
            Ok(response) => {
                warn!(status = response.status, "music suggestion rejected");
                self.notice = Some(Notice::error(REJECTED_MESSAGE));
                Err(DomainError::Rejected(response.status))
            }
            Err(e) => {
                warn!(error = %e, "music suggestion failed");
                self.notice = Some(Notice::error(TRANSPORT_MESSAGE));
                Err(e)
            }
        }
    }

    /// Read-only view of the form.
    #[must_use]
    pub fn snapshot(&self) -> MusicSnapshot {
        MusicSnapshot {
            form: self.form.clone(),
            submitting: self.submitting,
            confirmation_visible: self.is_confirmation_visible(),
            notice: self.notice.clone(),
        }
    }
}

impl std::fmt::Debug for MusicController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicController")
            .field("form", &self.form)
            .field("submitting", &self.submitting)
            .field("submitted_at", &self.submitted_at)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use boda_core::submission::SubmitResponse;
    use boda_test_support::{FailingSubmitter, ManualClock, RecordingSubmitter};
    use chrono::TimeZone;
    use serde_json::json;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap()
    }

    fn controller(
        submitter: Arc<dyn FormSubmitter>,
        clock: Arc<ManualClock>,
    ) -> MusicController {
        let settings = MusicSettings {
            endpoint: "https://forms.test/musica".into(),
            ..MusicSettings::default()
        };
        MusicController::new(Arc::new(settings), submitter, clock)
    }

    fn fill(controller: &mut MusicController) {
        let form = controller.form_mut();
        form.song = "Bailando".into();
        form.artist = "Enrique Iglesias".into();
        form.name = "Tía Carmen".into();
    }

    #[tokio::test]
    async fn test_submit_clears_form_and_shows_confirmation_for_three_seconds() {
        // Arrange
        let clock = Arc::new(ManualClock::new(start()));
        let submitter = Arc::new(RecordingSubmitter::new(SubmitResponse::ok()));
        let mut controller = controller(
            Arc::clone(&submitter) as Arc<dyn FormSubmitter>,
            Arc::clone(&clock),
        );
        fill(&mut controller);

        // Act
        controller.submit().await.unwrap();

        // Assert
        assert_eq!(controller.form(), &MusicForm::default());
        assert!(controller.is_confirmation_visible());
        clock.advance(TimeDelta::milliseconds(2_999));
        assert!(controller.is_confirmation_visible());
        clock.advance(TimeDelta::milliseconds(1));
        assert!(!controller.is_confirmation_visible());

        assert_eq!(
            submitter.submissions()[0].1,
            json!({
                "tipo": "sugerencia_musica",
                "cancion": "Bailando",
                "artista": "Enrique Iglesias",
                "nombre": "Tía Carmen",
                "fecha": "2026-08-01T09:00:00.000Z",
            })
        );
    }

    #[tokio::test]
    async fn test_blank_song_is_rejected_locally() {
        let submitter = Arc::new(RecordingSubmitter::new(SubmitResponse::ok()));
        let mut controller = controller(
            Arc::clone(&submitter) as Arc<dyn FormSubmitter>,
            Arc::new(ManualClock::new(start())),
        );
        controller.form_mut().artist = "Rosalía".into();

        let result = controller.submit().await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(
            controller.notice().map(|n| n.message.as_str()),
            Some(MISSING_SONG_MESSAGE)
        );
        assert!(submitter.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_keeps_form() {
        let mut controller = controller(
            Arc::new(RecordingSubmitter::new(SubmitResponse::with_status(500))),
            Arc::new(ManualClock::new(start())),
        );
        fill(&mut controller);

        let result = controller.submit().await;

        assert!(matches!(result, Err(DomainError::Rejected(500))));
        assert_eq!(controller.form().song, "Bailando");
        assert!(!controller.is_confirmation_visible());
    }

    #[tokio::test]
    async fn test_transport_failure_is_surfaced() {
        // Arrange
        let mut controller = controller(
            Arc::new(FailingSubmitter::new()),
            Arc::new(ManualClock::new(start())),
        );
        fill(&mut controller);

        // Act
        let result = controller.submit().await;

        // Assert
        assert!(matches!(result, Err(DomainError::Transport(_))));
        assert_eq!(
            controller.notice().map(|n| n.message.as_str()),
            Some(TRANSPORT_MESSAGE)
        );
        assert_eq!(controller.form().song, "Bailando");
        assert!(!controller.snapshot().submitting);
    }
}
