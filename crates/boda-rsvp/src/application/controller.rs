//! Step controller for the RSVP flow.
//!
//! The controller owns one guest's form for as long as they stay on the
//! page. Submission is split in two halves so a caller can release its own
//! lock while the request is in flight: [`RsvpController::begin_submit`]
//! validates and raises the in-flight flag, [`RsvpController::finish_submit`]
//! always lowers it again. [`RsvpController::submit`] runs both.

use std::sync::Arc;

use boda_core::clock::Clock;
use boda_core::error::DomainError;
use boda_core::notice::Notice;
use boda_core::submission::{FormSubmitter, SubmitResponse};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::confirmation::{Confirmation, calendar_url, days_until};
use crate::domain::deadline::{DeadlineStatus, deadline_status};
use crate::domain::form::{RsvpField, RsvpForm};
use crate::domain::payload::RsvpPayload;
use crate::domain::steps::RsvpStep;
use crate::domain::validation::{RsvpErrors, validate_step};
use crate::settings::RsvpSettings;

const REJECTED_MESSAGE: &str = "Error al guardar los datos. Inténtalo de nuevo.";
const TRANSPORT_MESSAGE: &str = "Error de conexión. Inténtalo de nuevo más tarde.";

/// A submission that has passed validation and is ready to send.
pub struct PendingRsvp {
    submitter: Arc<dyn FormSubmitter>,
    endpoint: String,
    payload: serde_json::Value,
}

impl PendingRsvp {
    /// The serialized attendance record.
    #[must_use]
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Sends the record to the attendance endpoint.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Transport` if no response was received.
    pub async fn send(self) -> Result<SubmitResponse, DomainError> {
        self.submitter.submit(&self.endpoint, &self.payload).await
    }
}

impl std::fmt::Debug for PendingRsvp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRsvp")
            .field("endpoint", &self.endpoint)
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}

/// Read-only view of the flow, for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct RsvpSnapshot {
    /// Current step.
    pub step: RsvpStep,
    /// Position of the step in the progress indicator.
    pub step_number: u8,
    /// Current field values.
    pub form: RsvpForm,
    /// Validation messages from the last check.
    pub errors: RsvpErrors,
    /// A submission is in flight.
    pub submitting: bool,
    /// Transient message from the last operation.
    pub notice: Option<Notice>,
    /// Deadline notice, hidden once confirmed.
    pub deadline: Option<DeadlineStatus>,
    /// Thank-you view, once confirmed.
    pub confirmation: Option<Confirmation>,
}

/// Drives one guest through identity, logistics and confirmation.
pub struct RsvpController {
    settings: Arc<RsvpSettings>,
    submitter: Arc<dyn FormSubmitter>,
    clock: Arc<dyn Clock>,
    form: RsvpForm,
    step: RsvpStep,
    errors: RsvpErrors,
    submitting: bool,
    notice: Option<Notice>,
}

impl RsvpController {
    /// Starts an empty form on the identity step.
    #[must_use]
    pub fn new(
        settings: Arc<RsvpSettings>,
        submitter: Arc<dyn FormSubmitter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            submitter,
            clock,
            form: RsvpForm::default(),
            step: RsvpStep::Identity,
            errors: RsvpErrors::new(),
            submitting: false,
            notice: None,
        }
    }

    /// Current step.
    #[must_use]
    pub fn step(&self) -> RsvpStep {
        self.step
    }

    /// Current field values.
    #[must_use]
    pub fn form(&self) -> &RsvpForm {
        &self.form
    }

    /// Validation messages from the last check.
    #[must_use]
    pub fn errors(&self) -> &RsvpErrors {
        &self.errors
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

    /// Updates one field from user input and clears its error.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` once the RSVP is confirmed or
    /// while a submission is in flight, or `DomainError::Validation` for an
    /// unrecognized bus answer.
    pub fn set_field(&mut self, field: RsvpField, value: &str) -> Result<(), DomainError> {
        if self.step == RsvpStep::Confirmation {
            return Err(DomainError::InvalidState(
                "attendance already confirmed".into(),
            ));
        }
        self.ensure_idle()?;
        self.notice = None;
        self.form.set(field, value)?;
        self.errors.clear(field);
        Ok(())
    }

    /// Validates the identity step and moves on to logistics.
    ///
    /// On failure the error map is populated and the step is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a field is missing or malformed,
    /// or `DomainError::InvalidState` outside the identity step.
    pub fn advance(&mut self) -> Result<RsvpStep, DomainError> {
        if self.step != RsvpStep::Identity {
            return Err(DomainError::InvalidState(format!(
                "cannot advance from {:?}",
                self.step
            )));
        }
        self.notice = None;
        self.check_current_step()?;
        self.step = RsvpStep::Logistics;
        info!(step = ?self.step, "rsvp advanced");
        Ok(self.step)
    }

    /// Goes back from logistics to identity without re-validating.
    ///
    /// Does nothing on the identity or confirmation steps.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` while a submission is in flight.
    pub fn retreat(&mut self) -> Result<RsvpStep, DomainError> {
        self.ensure_idle()?;
        if self.step == RsvpStep::Logistics {
            self.step = RsvpStep::Identity;
            self.errors = RsvpErrors::new();
            self.notice = None;
            info!(step = ?self.step, "rsvp retreated");
        }
        Ok(self.step)
    }

    /// Validates the logistics step and raises the in-flight flag.
    ///
    /// Every successful call must be followed by [`Self::finish_submit`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` outside the logistics step or
    /// while another submission is in flight, and `DomainError::Validation`
    /// if the step does not validate.
    pub fn begin_submit(&mut self) -> Result<PendingRsvp, DomainError> {
        if self.step != RsvpStep::Logistics {
            return Err(DomainError::InvalidState(format!(
                "cannot submit from {:?}",
                self.step
            )));
        }
        self.ensure_idle()?;
        self.notice = None;
        self.check_current_step()?;

        let payload = serde_json::to_value(RsvpPayload::from(&self.form))
            .map_err(|e| DomainError::Validation(format!("payload serialization failed: {e}")))?;

        self.submitting = true;
        info!("rsvp submission started");

        Ok(PendingRsvp {
            submitter: Arc::clone(&self.submitter),
            endpoint: self.settings.endpoint.clone(),
            payload,
        })
    }

    /// Records the outcome of a submission and lowers the in-flight flag.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Rejected` for a non-OK response, or the
    /// transport error unchanged. Either way a notice is raised and the
    /// guest stays on logistics.
    pub fn finish_submit(
        &mut self,
        result: Result<SubmitResponse, DomainError>,
    ) -> Result<Confirmation, DomainError> {
        self.submitting = false;

        match result {
            Ok(response) if response.is_ok() => {
                self.step = RsvpStep::Confirmation;
                info!(status = response.status, "rsvp confirmed");
                Ok(self.build_confirmation())
            }
            Ok(response) => {
                warn!(status = response.status, "rsvp submission rejected");
                self.notice = Some(Notice::error(REJECTED_MESSAGE));
                Err(DomainError::Rejected(response.status))
            }
            Err(e) => {
                warn!(error = %e, "rsvp submission failed");
                self.notice = Some(Notice::error(TRANSPORT_MESSAGE));
                Err(e)
            }
        }
    }

    /// Validates, sends and records the submission in one go.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_submit`] and [`Self::finish_submit`].
    pub async fn submit(&mut self) -> Result<Confirmation, DomainError> {
        let pending = self.begin_submit()?;
        let result = pending.send().await;
        self.finish_submit(result)
    }

    /// The thank-you view, once confirmed.
    #[must_use]
    pub fn confirmation(&self) -> Option<Confirmation> {
        (self.step == RsvpStep::Confirmation).then(|| self.build_confirmation())
    }

    /// The deadline notice as of now.
    #[must_use]
    pub fn deadline(&self) -> DeadlineStatus {
        deadline_status(self.clock.now(), self.settings.deadline)
    }

    /// Read-only view of the whole flow.
    #[must_use]
    pub fn snapshot(&self) -> RsvpSnapshot {
        let confirmation = self.confirmation();
        RsvpSnapshot {
            step: self.step,
            step_number: self.step.number(),
            form: self.form.clone(),
            errors: self.errors.clone(),
            submitting: self.submitting,
            notice: self.notice.clone(),
            deadline: confirmation.is_none().then(|| self.deadline()),
            confirmation,
        }
    }

    fn ensure_idle(&self) -> Result<(), DomainError> {
        if self.submitting {
            return Err(DomainError::InvalidState(
                "submission already in flight".into(),
            ));
        }
        Ok(())
    }

    fn check_current_step(&mut self) -> Result<(), DomainError> {
        self.errors = validate_step(self.step, &self.form, &self.settings.bus_stops);
        if self.errors.is_empty() {
            return Ok(());
        }
        let fields: Vec<String> = self.errors.fields().map(|f| format!("{f:?}")).collect();
        info!(step = ?self.step, fields = ?fields, "rsvp step failed validation");
        Err(DomainError::Validation(format!(
            "invalid fields: {}",
            fields.join(", ")
        )))
    }

    fn build_confirmation(&self) -> Confirmation {
        Confirmation {
            name: self.form.name.clone(),
            email: self.form.email.clone(),
            days_until_wedding: days_until(self.clock.now(), self.settings.wedding_at),
            calendar_url: calendar_url(&self.settings.calendar),
        }
    }
}

impl std::fmt::Debug for RsvpController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsvpController")
            .field("step", &self.step)
            .field("form", &self.form)
            .field("errors", &self.errors)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}
