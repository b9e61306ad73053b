//! One visitor's pass through the quiz, from the replay check to the
//! result submission.

use std::sync::Arc;

use boda_core::clock::Clock;
use boda_core::error::DomainError;
use boda_core::notice::Notice;
use boda_core::store::KeyValueStore;
use boda_core::submission::{
    FormSubmitter, SubmitResponse, TransportFailurePolicy, payload_timestamp,
};
use boda_core::validation::is_blank;
use serde::Serialize;
use tracing::{info, warn};

use super::session::QuizSession;
use crate::domain::game::{AnswerLock, QuizGame, QuizPhase, QuizTiming};
use crate::domain::payload::{QUIZ_PAYLOAD_KIND, QuizResultPayload};
use crate::domain::result::ResultTier;
use crate::settings::QuizSettings;

/// Store key of the "already played" flag.
pub const QUIZ_PLAYED_KEY: &str = "quiz_played";

/// Response `message` the endpoint uses for an email it has seen before.
pub const DUPLICATE_EMAIL_SENTINEL: &str = "email_exists";

const DUPLICATE_EMAIL_MESSAGE: &str = "Este email ya ha sido registrado";
const REJECTED_MESSAGE: &str = "Error al enviar. Inténtalo de nuevo.";
const TRANSPORT_MESSAGE: &str = "Error de conexión. Inténtalo de nuevo más tarde.";
const MISSING_FIELDS_MESSAGE: &str = "Por favor, completa los campos obligatorios";

/// How a result submission ended, when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizSubmissionOutcome {
    /// The endpoint accepted the result.
    Recorded,
    /// The endpoint already has a result for this email; nothing changed.
    DuplicateEmail,
    /// The request never got a response and the policy says to carry on.
    AssumedRecorded,
}

/// A validated result ready to send.
pub struct PendingQuizResult {
    submitter: Arc<dyn FormSubmitter>,
    endpoint: String,
    payload: serde_json::Value,
}

impl PendingQuizResult {
    /// The serialized result.
    #[must_use]
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Sends the result to the quiz endpoint.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Transport` if no response was received.
    pub async fn send(self) -> Result<SubmitResponse, DomainError> {
        self.submitter.submit(&self.endpoint, &self.payload).await
    }
}

impl std::fmt::Debug for PendingQuizResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingQuizResult")
            .field("endpoint", &self.endpoint)
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}

/// The question on screen, as the player sees it.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    /// Position, starting at zero.
    pub index: usize,
    /// Question text.
    pub prompt: String,
    /// Answer options.
    pub options: Vec<String>,
    /// Seconds left on the countdown.
    pub time_left: u32,
    /// How the question was closed, if it was.
    pub locked: Option<AnswerLock>,
    /// Revealed only once the question is closed.
    pub correct_index: Option<usize>,
}

/// The end screen.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    /// Tier reached.
    pub tier: ResultTier,
    /// Heading.
    pub title: &'static str,
    /// Body text.
    pub message: String,
}

/// Read-only view of the flow, for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSnapshot {
    /// Coarse phase.
    pub phase: QuizPhase,
    /// Correct answers so far.
    pub score: u32,
    /// Number of questions.
    pub total: usize,
    /// Rounded percentage.
    pub percentage: u32,
    /// Present while playing.
    pub question: Option<QuestionView>,
    /// Present once finished.
    pub result: Option<ResultView>,
    /// A submission is in flight.
    pub submitting: bool,
    /// The result has been sent.
    pub submitted: bool,
    /// Transient message from the last operation.
    pub notice: Option<Notice>,
}

/// The quiz for one visitor.
pub struct QuizFlow {
    settings: Arc<QuizSettings>,
    store: Arc<dyn KeyValueStore>,
    submitter: Arc<dyn FormSubmitter>,
    clock: Arc<dyn Clock>,
    session: QuizSession,
    submitting: bool,
    submitted: bool,
    notice: Option<Notice>,
}

impl QuizFlow {
    /// Reads the "already played" flag from `store` and sets up the game.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the flag cannot be read and
    /// `DomainError::Validation` if the configured questions are malformed.
    pub fn new(
        settings: Arc<QuizSettings>,
        store: Arc<dyn KeyValueStore>,
        submitter: Arc<dyn FormSubmitter>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        let already_played = store.is_flag_set(QUIZ_PLAYED_KEY)?;
        let game = QuizGame::new(
            settings.questions.clone(),
            QuizTiming::from(settings.as_ref()),
            already_played,
        )?;
        info!(already_played, "quiz flow created");
        Ok(Self {
            settings,
            store,
            submitter,
            clock,
            session: QuizSession::new(game),
            submitting: false,
            submitted: false,
            notice: None,
        })
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.session.phase()
    }

    /// Whether the result has been sent.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Transient message from the last operation.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Starts the game.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the flow is in `Intro`.
    pub fn start(&mut self) -> Result<(), DomainError> {
        self.session.start()
    }

    /// Locks in an answer; `false` if the question was already closed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` outside `Playing` and
    /// `DomainError::Validation` for an unknown option.
    pub fn answer(&mut self, option: usize) -> Result<bool, DomainError> {
        self.session.answer(option)
    }

    /// Validates the player's details and raises the in-flight flag.
    ///
    /// Every successful call must be followed by [`Self::finish_submission`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` outside `Result`, after a
    /// completed submission or while one is in flight, and
    /// `DomainError::Validation` if name or email is blank.
    pub fn begin_submission(
        &mut self,
        name: &str,
        email: &str,
    ) -> Result<PendingQuizResult, DomainError> {
        if self.phase() != QuizPhase::Result {
            return Err(DomainError::InvalidState(format!(
                "cannot submit from {:?}",
                self.phase()
            )));
        }
        if self.submitted {
            return Err(DomainError::InvalidState("result already sent".into()));
        }
        if self.submitting {
            return Err(DomainError::InvalidState(
                "submission already in flight".into(),
            ));
        }
        if is_blank(name) || is_blank(email) {
            self.notice = Some(Notice::error(MISSING_FIELDS_MESSAGE));
            return Err(DomainError::Validation("name and email are required".into()));
        }
        self.notice = None;

        let (score, total, percentage) = self
            .session
            .read(|game| (game.score(), game.total(), game.percentage()));
        let payload = serde_json::to_value(QuizResultPayload {
            tipo: QUIZ_PAYLOAD_KIND,
            nombre: name,
            email,
            puntuacion: score,
            total_preguntas: total,
            porcentaje: percentage,
            fecha: payload_timestamp(self.clock.now()),
        })
        .map_err(|e| DomainError::Validation(format!("payload serialization failed: {e}")))?;

        self.submitting = true;
        info!(score, total, "quiz submission started");

        Ok(PendingQuizResult {
            submitter: Arc::clone(&self.submitter),
            endpoint: self.settings.endpoint.clone(),
            payload,
        })
    }

    /// Records the outcome of a submission and lowers the in-flight flag.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Rejected` for a non-OK response, and the
    /// transport error when the policy surfaces it.
    pub fn finish_submission(
        &mut self,
        result: Result<SubmitResponse, DomainError>,
    ) -> Result<QuizSubmissionOutcome, DomainError> {
        self.submitting = false;

        match result {
            Ok(response) if response.message() == Some(DUPLICATE_EMAIL_SENTINEL) => {
                info!("quiz result refused: email already registered");
                self.notice = Some(Notice::error(DUPLICATE_EMAIL_MESSAGE));
                Ok(QuizSubmissionOutcome::DuplicateEmail)
            }
            Ok(response) if response.is_ok() => {
                info!(status = response.status, "quiz result recorded");
                self.mark_submitted();
                Ok(QuizSubmissionOutcome::Recorded)
            }
            Ok(response) => {
                warn!(status = response.status, "quiz submission rejected");
                self.notice = Some(Notice::error(REJECTED_MESSAGE));
                Err(DomainError::Rejected(response.status))
            }
            Err(e) => match self.settings.transport_failure {
                TransportFailurePolicy::MaskAsSuccess => {
                    warn!(error = %e, "quiz submission failed; treating as recorded, result may be lost");
                    self.mark_submitted();
                    Ok(QuizSubmissionOutcome::AssumedRecorded)
                }
                TransportFailurePolicy::Surface => {
                    warn!(error = %e, "quiz submission failed");
                    self.notice = Some(Notice::error(TRANSPORT_MESSAGE));
                    Err(e)
                }
            },
        }
    }

    /// Validates, sends and records the result in one go.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_submission`] and [`Self::finish_submission`].
    pub async fn submit_result(
        &mut self,
        name: &str,
        email: &str,
    ) -> Result<QuizSubmissionOutcome, DomainError> {
        let pending = self.begin_submission(name, email)?;
        let result = pending.send().await;
        self.finish_submission(result)
    }

    /// Stops the countdown task.
    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }

    /// Read-only view of the whole flow.
    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        self.session.read(|game| {
            let phase = game.phase();
            let question = (phase == QuizPhase::Playing).then(|| {
                let current = game.current_question();
                QuestionView {
                    index: game.cursor(),
                    prompt: current.prompt.clone(),
                    options: current.options.clone(),
                    time_left: game.time_left(),
                    locked: game.lock(),
                    correct_index: game.lock().map(|_| current.correct_index),
                }
            });
            let result = (phase == QuizPhase::Result).then(|| {
                let tier = ResultTier::from_percentage(game.percentage());
                ResultView {
                    tier,
                    title: tier.title(),
                    message: tier.message(&self.settings.couple),
                }
            });
            QuizSnapshot {
                phase,
                score: game.score(),
                total: game.total(),
                percentage: game.percentage(),
                question,
                result,
                submitting: self.submitting,
                submitted: self.submitted,
                notice: self.notice.clone(),
            }
        })
    }

    fn mark_submitted(&mut self) {
        self.submitted = true;
        if let Err(e) = self.store.set_flag(QUIZ_PLAYED_KEY) {
            warn!(error = %e, "could not persist quiz played flag");
        }
    }
}

impl std::fmt::Debug for QuizFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizFlow")
            .field("session", &self.session)
            .field("submitting", &self.submitting)
            .field("submitted", &self.submitted)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}
