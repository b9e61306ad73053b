//! Application layer for the quiz.

pub mod flow;
pub mod session;
