//! Route modules, one per flow.

use serde::Serialize;
use uuid::Uuid;

pub mod gallery;
pub mod health;
pub mod music;
pub mod preboda;
pub mod quiz;
pub mod rsvp;

/// Response body returned when a flow instance is created.
#[derive(Debug, Serialize)]
pub struct FlowCreated<S> {
    /// Id to address the flow with.
    pub flow_id: Uuid,
    /// Initial state.
    pub state: S,
}
