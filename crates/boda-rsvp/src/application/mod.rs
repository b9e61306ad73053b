//! Application layer for the RSVP flow.

pub mod controller;
