//! Boda Quiz — timed trivia about the couple.
//!
//! One question at a time, fifteen seconds each. The final score can be
//! sent once per visitor; a persisted flag keeps the visitor from playing
//! again.

pub mod application;
pub mod domain;
pub mod settings;
