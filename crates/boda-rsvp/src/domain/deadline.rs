//! RSVP deadline notice.

use chrono::{DateTime, Utc};
use serde::Serialize;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Days left at or under which the notice turns urgent.
pub const URGENT_WITHIN_DAYS: i64 = 7;

/// How the deadline notice reads at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeadlineStatus {
    /// Confirmations are still expected.
    Open {
        /// Whole days left, rounded up.
        days_left: i64,
        /// Within the last week.
        urgent: bool,
    },
    /// The deadline has gone by.
    Passed,
}

/// Evaluates the deadline notice at `now`.
#[must_use]
pub fn deadline_status(now: DateTime<Utc>, deadline: DateTime<Utc>) -> DeadlineStatus {
    if now > deadline {
        return DeadlineStatus::Passed;
    }
    let remaining = (deadline - now).num_seconds();
    let days_left = (remaining + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    DeadlineStatus::Open {
        days_left,
        urgent: days_left > 0 && days_left <= URGENT_WITHIN_DAYS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn deadline() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 20, 21, 59, 59).unwrap()
    }

    #[test]
    fn test_far_from_deadline_is_open_and_calm() {
        let now = deadline() - Duration::days(30);

        assert_eq!(
            deadline_status(now, deadline()),
            DeadlineStatus::Open {
                days_left: 30,
                urgent: false
            }
        );
    }

    #[test]
    fn test_partial_days_round_up() {
        let now = deadline() - Duration::days(6) - Duration::hours(3);

        assert_eq!(
            deadline_status(now, deadline()),
            DeadlineStatus::Open {
                days_left: 7,
                urgent: true
            }
        );
    }

    #[test]
    fn test_last_hours_are_urgent() {
        let now = deadline() - Duration::hours(2);

        assert_eq!(
            deadline_status(now, deadline()),
            DeadlineStatus::Open {
                days_left: 1,
                urgent: true
            }
        );
    }

    #[test]
    fn test_after_deadline_is_passed() {
        let now = deadline() + Duration::seconds(1);

        assert_eq!(deadline_status(now, deadline()), DeadlineStatus::Passed);
    }
}
