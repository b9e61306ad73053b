//! Landing hero: background parallax and the swipe that moves on to the
//! information page.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

/// How much slower than the page the background moves.
pub const PARALLAX_FACTOR: f64 = 0.3;

/// Minimum downward wheel delta or swipe distance that counts as "next".
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

/// Length of the hero's exit animation.
pub const EXIT_TRANSITION: Duration = Duration::from_millis(500);

/// Where the hero leads.
pub const NEXT_PAGE: &str = "/info";

/// Vertical background offset for a scroll position.
#[must_use]
pub fn parallax_offset(scroll_y: f64) -> f64 {
    scroll_y * PARALLAX_FACTOR
}

/// Navigation the hero asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroExit {
    /// Target path.
    pub destination: &'static str,
    /// Delay before navigating, while the exit animation plays.
    pub after: Duration,
}

/// Turns wheel and touch input into at most one navigation.
#[derive(Debug, Default)]
pub struct HeroNavigator {
    touch_start: Option<f64>,
    navigated: bool,
}

impl HeroNavigator {
    /// Creates a navigator that has not fired yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the navigation already fired.
    #[must_use]
    pub fn has_navigated(&self) -> bool {
        self.navigated
    }

    /// A mouse wheel event with vertical delta `delta_y`.
    pub fn on_wheel(&mut self, delta_y: f64) -> Option<HeroExit> {
        self.fire_if(delta_y)
    }

    /// A finger touched the screen at `y`.
    pub fn on_touch_start(&mut self, y: f64) {
        self.touch_start = Some(y);
    }

    /// The finger left the screen at `y`.
    pub fn on_touch_end(&mut self, y: f64) -> Option<HeroExit> {
        let start = self.touch_start.take()?;
        self.fire_if(start - y)
    }

    fn fire_if(&mut self, delta: f64) -> Option<HeroExit> {
        if self.navigated || delta <= SWIPE_THRESHOLD_PX {
            return None;
        }
        self.navigated = true;
        debug!(delta, "hero navigating");
        Some(HeroExit {
            destination: NEXT_PAGE,
            after: EXIT_TRANSITION,
        })
    }
}
