//! Transient user-facing notifications.

use serde::Serialize;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Something went wrong; the user may retry.
    Error,
    /// The action went through.
    Success,
}

/// A short message a flow wants shown to the user once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text, in the site's language.
    pub message: String,
}

impl Notice {
    /// Creates an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }
}
