//! Splash screen, shown once per browser session.

use std::sync::Arc;
use std::time::Duration;

use boda_core::error::DomainError;
use boda_core::store::KeyValueStore;
use serde::Serialize;

/// Session store key set once the splash has played.
pub const SPLASH_SEEN_KEY: &str = "has_visited";

/// Splash phase at some point after it appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplashPhase {
    /// Fully visible.
    Showing,
    /// Fading out.
    Exiting,
    /// Gone.
    Done,
}

/// How long each splash phase lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplashTiming {
    /// Fully visible.
    pub display: Duration,
    /// Fade-out.
    pub exit: Duration,
}

impl Default for SplashTiming {
    fn default() -> Self {
        Self {
            display: Duration::from_millis(1800),
            exit: Duration::from_millis(600),
        }
    }
}

impl SplashTiming {
    /// Phase `elapsed` after the splash appeared.
    #[must_use]
    pub fn phase_at(&self, elapsed: Duration) -> SplashPhase {
        if elapsed < self.display {
            SplashPhase::Showing
        } else if elapsed < self.display + self.exit {
            SplashPhase::Exiting
        } else {
            SplashPhase::Done
        }
    }
}

/// Decides whether the splash plays, over the session store.
pub struct SplashGate {
    session: Arc<dyn KeyValueStore>,
}

impl SplashGate {
    /// Creates a gate over `session`.
    #[must_use]
    pub fn new(session: Arc<dyn KeyValueStore>) -> Self {
        Self { session }
    }

    /// Whether the splash should play on this page load.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the session store cannot be read.
    pub fn should_show(&self) -> Result<bool, DomainError> {
        Ok(!self.session.is_flag_set(SPLASH_SEEN_KEY)?)
    }

    /// Records that the splash finished playing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the session store cannot be written.
    pub fn complete(&self) -> Result<(), DomainError> {
        self.session.set_flag(SPLASH_SEEN_KEY)
    }
}

impl std::fmt::Debug for SplashGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplashGate").finish_non_exhaustive()
    }
}
