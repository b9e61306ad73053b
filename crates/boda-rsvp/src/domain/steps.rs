//! Steps of the RSVP flow.

use serde::Serialize;

/// Where the guest is in the RSVP flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStep {
    /// Name, surname, companions, phone, email.
    Identity,
    /// Bus service, pickup stop, shoe size, dietary notes.
    Logistics,
    /// Submission accepted.
    Confirmation,
}

impl RsvpStep {
    /// Position shown in the progress indicator, starting at 1.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Identity => 1,
            Self::Logistics => 2,
            Self::Confirmation => 3,
        }
    }
}
