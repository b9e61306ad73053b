//! Field validators shared by the forms.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{9}$").expect("phone pattern is a valid regex"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Maximum number of digits a phone number may hold.
pub const PHONE_DIGITS: usize = 9;

/// Whether `phone` is exactly nine ASCII digits.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// Whether `email` looks like `local@domain.tld`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Keeps only the ASCII digits of `input`, at most `max` of them.
#[must_use]
pub fn digits_only(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Whether `value` has any non-whitespace content.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Per-field validation messages for one form step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors<F: Ord>(BTreeMap<F, String>);

impl<F: Ord> Default for FieldErrors<F> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<F: Ord + Copy> FieldErrors<F> {
    /// Creates an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Drops the message for `field`.
    pub fn clear(&mut self, field: F) {
        self.0.remove(&field);
    }

    /// The message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: F) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with an error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Fields with an error, in order.
    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.0.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_accepts_exactly_nine_digits() {
        assert!(is_valid_phone("123456789"));
    }

    #[test]
    fn test_phone_rejects_short_alpha_and_empty() {
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("12345678a"));
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("1234567890"));
    }

    #[test]
    fn test_phone_rejects_non_ascii_digits() {
        // Arabic-Indic digits are Unicode digits but not valid here.
        assert!(!is_valid_phone("١٢٣٤٥٦٧٨٩"));
    }

    #[test]
    fn test_email_accepts_local_at_domain() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("pablo.vega@example.es"));
    }

    #[test]
    fn test_email_rejects_missing_parts() {
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn test_digits_only_strips_and_truncates() {
        assert_eq!(digits_only("600 12-34 56789", PHONE_DIGITS), "600123456");
        assert_eq!(digits_only("abc", PHONE_DIGITS), "");
        assert_eq!(digits_only("12a3", PHONE_DIGITS), "123");
    }

    #[test]
    fn test_field_errors_insert_and_clear() {
        // Arrange
        let mut errors: FieldErrors<u8> = FieldErrors::new();

        // Act
        errors.insert(2, "second");
        errors.insert(1, "first");
        errors.clear(2);

        // Assert
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(1), Some("first"));
        assert_eq!(errors.get(2), None);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![1]);
    }
}
