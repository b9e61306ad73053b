//! Quiz questions.

use boda_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text.
    pub prompt: String,
    /// Options in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_index: usize,
}

impl Question {
    /// Creates a question.
    #[must_use]
    pub fn new(prompt: &str, options: &[&str], correct_index: usize) -> Self {
        Self {
            prompt: prompt.to_owned(),
            options: options.iter().map(|&o| o.to_owned()).collect(),
            correct_index,
        }
    }

    /// Checks the question can be played.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if there are fewer than two
    /// options or the correct index is out of range.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.options.len() < 2 {
            return Err(DomainError::Validation(format!(
                "question {:?} needs at least two options",
                self.prompt
            )));
        }
        if self.correct_index >= self.options.len() {
            return Err(DomainError::Validation(format!(
                "question {:?} has correct index {} but {} options",
                self.prompt,
                self.correct_index,
                self.options.len()
            )));
        }
        Ok(())
    }

    /// Whether `option` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }
}

/// The questions the couple wrote.
#[must_use]
pub fn default_questions() -> Vec<Question> {
    vec![
        Question::new(
            "¿Dónde se conocieron Pablo y Vega?",
            &["En una fiesta", "En el trabajo", "Por amigos en común", "En la universidad"],
            2,
        ),
        Question::new(
            "¿Cuál fue su primera cita?",
            &["Cena en un restaurante", "Paseo por la playa", "Cine", "Concierto"],
            0,
        ),
        Question::new(
            "¿Cuál es la película favorita de ambos?",
            &["Titanic", "The Notebook", "Up", "La La Land"],
            2,
        ),
        Question::new(
            "¿Cuál es el destino de viaje favorito de la pareja?",
            &["París", "Roma", "Bali", "Nueva York"],
            1,
        ),
        Question::new(
            "¿Qué comida les gusta compartir?",
            &["Pizza", "Sushi", "Tacos", "Pasta"],
            1,
        ),
        Question::new(
            "¿Cuántos años llevan juntos?",
            &["3 años", "5 años", "7 años", "8 años"],
            2,
        ),
        Question::new(
            "¿Cuál es su canción?",
            &["Perfect - Ed Sheeran", "Thinking Out Loud", "All of Me", "A Thousand Years"],
            0,
        ),
        Question::new(
            "¿Dónde fue la pedida de mano?",
            &["En casa", "En un viaje", "En un restaurante", "Es sorpresa"],
            1,
        ),
        Question::new(
            "¿Qué mascota tienen?",
            &["Un perro", "Un gato", "Ninguna", "Un conejo"],
            0,
        ),
        Question::new(
            "¿Cuál es el hobby que comparten?",
            &["Viajar", "Cocinar", "Ver series", "Todas las anteriores"],
            3,
        ),
    ]
}
