//! Domain model for the RSVP flow.

pub mod confirmation;
pub mod deadline;
pub mod form;
pub mod payload;
pub mod steps;
pub mod validation;
