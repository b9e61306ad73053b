//! Boda Core — shared abstractions for the wedding site flows.
//!
//! This crate defines the traits and small value types every flow depends
//! on: time, persisted flags, outbound form submission, transient notices,
//! owned timers and the field validators shared by the forms. It contains
//! no network code.

pub mod clock;
pub mod error;
pub mod notice;
pub mod store;
pub mod submission;
pub mod timer;
pub mod validation;
