//! Shared test mocks and utilities for the wedding site flows.

mod clock;
mod submitter;

pub use clock::{FixedClock, ManualClock};
pub use submitter::{FailingSubmitter, RecordingSubmitter};
