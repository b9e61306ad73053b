//! Time source for deadlines, payload stamps and confirmation windows.

use chrono::{DateTime, TimeDelta, Utc};

/// Where the flows read "now" from.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Time elapsed since `earlier`; negative if `earlier` is in the future.
    fn elapsed_since(&self, earlier: DateTime<Utc>) -> TimeDelta {
        self.now() - earlier
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
