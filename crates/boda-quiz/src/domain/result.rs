//! Result tiers shown at the end of the quiz.

use serde::Serialize;

/// How well the player knows the couple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultTier {
    /// Every answer right.
    Perfect,
    /// At least 70%.
    Great,
    /// At least 50%.
    Good,
    /// Below 50%.
    KeepTrying,
}

impl ResultTier {
    /// Picks the tier for a percentage in `0..=100`.
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            100.. => Self::Perfect,
            70..=99 => Self::Great,
            50..=69 => Self::Good,
            _ => Self::KeepTrying,
        }
    }

    /// Heading for the result screen.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Perfect => "¡Perfecto! 🎉",
            Self::Great => "¡Muy bien! ⭐",
            Self::Good => "¡Nada mal! 👏",
            Self::KeepTrying => "¡Sigue intentándolo! 💪",
        }
    }

    /// Body text for the result screen.
    #[must_use]
    pub fn message(self, couple: &str) -> String {
        match self {
            Self::Perfect => format!("¡Conoces a {couple} mejor que nadie!"),
            Self::Great => "Eres un gran amigo de los novios.".to_owned(),
            Self::Good => "Conoces bastante bien a la pareja.".to_owned(),
            Self::KeepTrying => "Tendrás que conocerlos mejor en la boda.".to_owned(),
        }
    }
}
