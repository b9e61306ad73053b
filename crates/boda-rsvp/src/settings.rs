//! Static configuration for the RSVP flow.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// Placeholder form-script URL; deployments override it.
pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/DEPLOYMENT_ID/exec";

/// Calendar entry offered on the confirmation screen.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalendarEvent {
    /// Event title.
    pub title: String,
    /// Start stamp in `YYYYMMDDTHHMMSS` form.
    pub start: String,
    /// End stamp in `YYYYMMDDTHHMMSS` form.
    pub end: String,
}

impl Default for CalendarEvent {
    fn default() -> Self {
        Self {
            title: "Boda Pablo & Vega".into(),
            start: "20260822T170000".into(),
            end: "20260823T040000".into(),
        }
    }
}

/// Settings for the RSVP flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RsvpSettings {
    /// Endpoint receiving attendance submissions.
    pub endpoint: String,
    /// Bus pickup stops a guest can choose from.
    pub bus_stops: Vec<String>,
    /// Last moment to confirm attendance.
    pub deadline: DateTime<Utc>,
    /// Ceremony start.
    pub wedding_at: DateTime<Utc>,
    /// Calendar entry for the confirmation screen.
    pub calendar: CalendarEvent,
}

impl Default for RsvpSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            bus_stops: vec!["Porriño".into(), "Vigo".into(), "Pontevedra".into()],
            // 2026-06-20 23:59:59 and 2026-08-22 17:00, Europe/Madrid (CEST).
            deadline: Utc
                .with_ymd_and_hms(2026, 6, 20, 21, 59, 59)
                .single()
                .unwrap_or_default(),
            wedding_at: Utc
                .with_ymd_and_hms(2026, 8, 22, 15, 0, 0)
                .single()
                .unwrap_or_default(),
            calendar: CalendarEvent::default(),
        }
    }
}
