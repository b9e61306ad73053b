//! Domain model for the quiz.

pub mod game;
pub mod payload;
pub mod question;
pub mod result;
