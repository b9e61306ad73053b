//! Pre-wedding party form.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use boda_core::clock::Clock;
use boda_core::error::DomainError;
use boda_core::notice::Notice;
use boda_core::submission::{FormSubmitter, TransportFailurePolicy, payload_timestamp};
use boda_core::validation::is_blank;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::settings::PrebodaSettings;

/// Value of the `tipo` field for pre-wedding answers.
pub const PREBODA_PAYLOAD_KIND: &str = "preboda";

const MISSING_FIELDS_MESSAGE: &str = "Por favor, completa los campos obligatorios";
const REJECTED_MESSAGE: &str = "Error al enviar. Inténtalo de nuevo.";
const TRANSPORT_MESSAGE: &str = "Error de conexión. Inténtalo de nuevo más tarde.";

/// Whether the guest comes to the party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attendance {
    /// Coming.
    #[serde(rename = "sí")]
    Yes,
    /// Not coming.
    #[serde(rename = "no")]
    No,
}

impl Attendance {
    /// The value the form endpoint expects.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "sí",
            Self::No => "no",
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attendance {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sí" | "si" | "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            other => Err(DomainError::Validation(format!(
                "unknown attendance answer: {other:?}"
            ))),
        }
    }
}

/// What the guest has filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrebodaForm {
    /// Guest name.
    pub name: String,
    /// `None` until the guest picks an option.
    pub attending: Option<Attendance>,
    /// Free-text list of companions; only sent when attending.
    pub companions: String,
}

#[derive(Debug, Serialize)]
struct PrebodaPayload<'a> {
    tipo: &'static str,
    nombre: &'a str,
    asistira: &'static str,
    acompanantes: &'a str,
    fecha: String,
}

/// How a submission ended, when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrebodaOutcome {
    /// The endpoint accepted the answer.
    Recorded,
    /// The request never got a response and the policy says to carry on.
    AssumedRecorded,
}

/// Read-only view of the form, for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct PrebodaSnapshot {
    /// Current field values.
    pub form: PrebodaForm,
    /// A submission is in flight.
    pub submitting: bool,
    /// The thank-you view is showing.
    pub submitted: bool,
    /// Transient message from the last operation.
    pub notice: Option<Notice>,
}

/// Drives the pre-wedding form.
pub struct PrebodaController {
    settings: Arc<PrebodaSettings>,
    submitter: Arc<dyn FormSubmitter>,
    clock: Arc<dyn Clock>,
    form: PrebodaForm,
    submitting: bool,
    submitted: bool,
    notice: Option<Notice>,
}

impl PrebodaController {
    /// Starts with an empty form.
    #[must_use]
    pub fn new(
        settings: Arc<PrebodaSettings>,
        submitter: Arc<dyn FormSubmitter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            submitter,
            clock,
            form: PrebodaForm::default(),
            submitting: false,
            submitted: false,
            notice: None,
        }
    }

    /// Current field values.
    #[must_use]
    pub fn form(&self) -> &PrebodaForm {
        &self.form
    }

    /// Field values, for editing.
    pub fn form_mut(&mut self) -> &mut PrebodaForm {
        self.notice = None;
        &mut self.form
    }

    /// Whether the thank-you view is showing.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Transient message from the last operation.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Validates and sends the answer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name or the attendance
    /// answer is missing, `DomainError::InvalidState` once submitted or
    /// while a submission is in flight, `DomainError::Rejected` for a
    /// non-OK response, and the transport error when the policy surfaces
    /// it.
    pub async fn submit(&mut self) -> Result<PrebodaOutcome, DomainError> {
        if self.submitted || self.submitting {
            return Err(DomainError::InvalidState(
                "pre-wedding answer already sent or in flight".into(),
            ));
        }
        let Some(attending) = self.form.attending.filter(|_| !is_blank(&self.form.name)) else {
            self.notice = Some(Notice::error(MISSING_FIELDS_MESSAGE));
            return Err(DomainError::Validation(
                "name and attendance are required".into(),
            ));
        };
        self.notice = None;

        let companions = match attending {
            Attendance::Yes => self.form.companions.as_str(),
            Attendance::No => "",
        };
        let payload = serde_json::to_value(PrebodaPayload {
            tipo: PREBODA_PAYLOAD_KIND,
            nombre: &self.form.name,
            asistira: attending.as_str(),
            acompanantes: companions,
            fecha: payload_timestamp(self.clock.now()),
        })
        .map_err(|e| DomainError::Validation(format!("payload serialization failed: {e}")))?;

        self.submitting = true;
        info!(attending = %attending, "pre-wedding submission started");
        let result = self.submitter.submit(&self.settings.endpoint, &payload).await;
        self.submitting = false;

        match result {
            Ok(response) if response.is_ok() => {
                info!(status = response.status, "pre-wedding answer recorded");
                self.submitted = true;
                Ok(PrebodaOutcome::Recorded)
            }
            Ok(response) => {
                warn!(status = response.status, "pre-wedding submission rejected");
                self.notice = Some(Notice::error(REJECTED_MESSAGE));
                Err(DomainError::Rejected(response.status))
            }
            Err(e) => match self.settings.transport_failure {
                TransportFailurePolicy::MaskAsSuccess => {
                    warn!(error = %e, "pre-wedding submission failed; treating as recorded, answer may be lost");
                    self.submitted = true;
                    Ok(PrebodaOutcome::AssumedRecorded)
                }
                TransportFailurePolicy::Surface => {
                    warn!(error = %e, "pre-wedding submission failed");
                    self.notice = Some(Notice::error(TRANSPORT_MESSAGE));
                    Err(e)
                }
            },
        }
    }

    /// Read-only view of the form.
    #[must_use]
    pub fn snapshot(&self) -> PrebodaSnapshot {
        PrebodaSnapshot {
            form: self.form.clone(),
            submitting: self.submitting,
            submitted: self.submitted,
            notice: self.notice.clone(),
        }
    }
}

impl fmt::Debug for PrebodaController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrebodaController")
            .field("form", &self.form)
            .field("submitting", &self.submitting)
            .field("submitted", &self.submitted)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boda_core::submission::SubmitResponse;
    use boda_test_support::{FailingSubmitter, FixedClock, RecordingSubmitter};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn controller(
        submitter: Arc<dyn FormSubmitter>,
        policy: TransportFailurePolicy,
    ) -> PrebodaController {
        let settings = PrebodaSettings {
            endpoint: "https://forms.test/preboda".into(),
            transport_failure: policy,
        };
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 6, 1, 18, 30, 0).unwrap());
        PrebodaController::new(Arc::new(settings), submitter, Arc::new(clock))
    }

    fn filled(controller: &mut PrebodaController, attending: Attendance) {
        let form = controller.form_mut();
        form.name = "Lucía".into();
        form.attending = Some(attending);
        form.companions = "Marcos".into();
    }

    #[test]
    fn test_attendance_parses_accented_and_plain_yes() {
        assert_eq!("sí".parse::<Attendance>().unwrap(), Attendance::Yes);
        assert_eq!("Si".parse::<Attendance>().unwrap(), Attendance::Yes);
        assert_eq!("no".parse::<Attendance>().unwrap(), Attendance::No);
        assert!("quizás".parse::<Attendance>().is_err());
    }

    #[tokio::test]
    async fn test_submit_posts_payload_and_marks_submitted() {
        // Arrange
        let submitter = Arc::new(RecordingSubmitter::new(SubmitResponse::ok()));
        let mut controller = controller(
            Arc::clone(&submitter) as Arc<dyn FormSubmitter>,
            TransportFailurePolicy::default(),
        );
        filled(&mut controller, Attendance::Yes);

        // Act
        let outcome = controller.submit().await.unwrap();

        // Assert
        assert_eq!(outcome, PrebodaOutcome::Recorded);
        assert!(controller.is_submitted());
        let sent = submitter.submissions();
        assert_eq!(sent[0].0, "https://forms.test/preboda");
        assert_eq!(
            sent[0].1,
            json!({
                "tipo": "preboda",
                "nombre": "Lucía",
                "asistira": "sí",
                "acompanantes": "Marcos",
                "fecha": "2026-06-01T18:30:00.000Z",
            })
        );
    }

    #[tokio::test]
    async fn test_companions_dropped_when_not_attending() {
        let submitter = Arc::new(RecordingSubmitter::new(SubmitResponse::ok()));
        let mut controller = controller(
            Arc::clone(&submitter) as Arc<dyn FormSubmitter>,
            TransportFailurePolicy::default(),
        );
        filled(&mut controller, Attendance::No);

        controller.submit().await.unwrap();

        let sent = submitter.submissions();
        assert_eq!(sent[0].1["asistira"], "no");
        assert_eq!(sent[0].1["acompanantes"], "");
    }

    #[tokio::test]
    async fn test_missing_attendance_is_rejected_locally() {
        // Arrange
        let submitter = Arc::new(RecordingSubmitter::new(SubmitResponse::ok()));
        let mut controller = controller(
            Arc::clone(&submitter) as Arc<dyn FormSubmitter>,
            TransportFailurePolicy::default(),
        );
        controller.form_mut().name = "Lucía".into();

        // Act
        let result = controller.submit().await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(
            controller.notice().map(|n| n.message.as_str()),
            Some(MISSING_FIELDS_MESSAGE)
        );
        assert!(submitter.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_locally() {
        let submitter = Arc::new(RecordingSubmitter::new(SubmitResponse::ok()));
        let mut controller = controller(
            Arc::clone(&submitter) as Arc<dyn FormSubmitter>,
            TransportFailurePolicy::default(),
        );
        controller.form_mut().attending = Some(Attendance::Yes);

        let result = controller.submit().await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(submitter.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_keeps_form_and_raises_notice() {
        let mut controller = controller(
            Arc::new(RecordingSubmitter::new(SubmitResponse::with_status(503))),
            TransportFailurePolicy::default(),
        );
        filled(&mut controller, Attendance::Yes);

        let result = controller.submit().await;

        assert!(matches!(result, Err(DomainError::Rejected(503))));
        assert!(!controller.is_submitted());
        assert_eq!(controller.form().name, "Lucía");
        assert_eq!(
            controller.notice().map(|n| n.message.as_str()),
            Some(REJECTED_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_transport_failure_masked_by_default() {
        let mut controller = controller(
            Arc::new(FailingSubmitter::new()),
            TransportFailurePolicy::MaskAsSuccess,
        );
        filled(&mut controller, Attendance::Yes);

        let outcome = controller.submit().await.unwrap();

        assert_eq!(outcome, PrebodaOutcome::AssumedRecorded);
        assert!(controller.is_submitted());
        assert!(controller.notice().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_when_configured() {
        let mut controller = controller(
            Arc::new(FailingSubmitter::new()),
            TransportFailurePolicy::Surface,
        );
        filled(&mut controller, Attendance::Yes);

        let result = controller.submit().await;

        assert!(matches!(result, Err(DomainError::Transport(_))));
        assert!(!controller.is_submitted());
        assert!(!controller.snapshot().submitting);
    }

    #[tokio::test]
    async fn test_second_submit_after_success_is_invalid_state() {
        let mut controller = controller(
            Arc::new(RecordingSubmitter::new(SubmitResponse::ok())),
            TransportFailurePolicy::default(),
        );
        filled(&mut controller, Attendance::Yes);
        controller.submit().await.unwrap();

        let result = controller.submit().await;

        assert!(matches!(result, Err(DomainError::InvalidState(_))));
    }
}
