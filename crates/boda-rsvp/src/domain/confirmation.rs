//! What the guest sees once the RSVP is accepted.

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::settings::CalendarEvent;

/// Characters `encodeURIComponent` leaves untouched, inverted.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const CALENDAR_BASE: &str = "https://calendar.google.com/calendar/render?action=TEMPLATE";

/// The thank-you view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    /// The guest's given name.
    pub name: String,
    /// Where the confirmation email goes.
    pub email: String,
    /// Whole days until the ceremony.
    pub days_until_wedding: i64,
    /// Link that pre-fills a calendar entry for the wedding.
    pub calendar_url: String,
}

/// Whole days from `now` to `wedding_at`, rounded down and never negative.
#[must_use]
pub fn days_until(now: DateTime<Utc>, wedding_at: DateTime<Utc>) -> i64 {
    (wedding_at - now).num_days().max(0)
}

/// Builds the "add to calendar" link for `event`.
#[must_use]
pub fn calendar_url(event: &CalendarEvent) -> String {
    format!(
        "{CALENDAR_BASE}&text={}&dates={}/{}",
        utf8_percent_encode(&event.title, COMPONENT),
        event.start,
        event.end
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_calendar_url_encodes_title() {
        let url = calendar_url(&CalendarEvent::default());

        assert_eq!(
            url,
            "https://calendar.google.com/calendar/render?action=TEMPLATE\
             &text=Boda%20Pablo%20%26%20Vega&dates=20260822T170000/20260823T040000"
        );
    }

    #[test]
    fn test_days_until_rounds_down() {
        let wedding = Utc.with_ymd_and_hms(2026, 8, 22, 15, 0, 0).unwrap();
        let now = wedding - Duration::days(10) - Duration::hours(5);

        assert_eq!(days_until(now, wedding), 10);
    }

    #[test]
    fn test_days_until_never_negative() {
        let wedding = Utc.with_ymd_and_hms(2026, 8, 22, 15, 0, 0).unwrap();

        assert_eq!(days_until(wedding + Duration::days(3), wedding), 0);
    }
}
