//! Wire payload sent to the quiz endpoint.

use serde::Serialize;

/// Value of the `tipo` field for quiz results.
pub const QUIZ_PAYLOAD_KIND: &str = "quiz";

/// A finished game as the form endpoint stores it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultPayload<'a> {
    /// Always [`QUIZ_PAYLOAD_KIND`].
    pub tipo: &'static str,
    /// Player name.
    pub nombre: &'a str,
    /// Player email; the endpoint rejects repeats.
    pub email: &'a str,
    /// Correct answers.
    pub puntuacion: u32,
    /// Questions asked.
    pub total_preguntas: usize,
    /// Rounded percentage.
    pub porcentaje: u32,
    /// Submission time.
    pub fecha: String,
}
