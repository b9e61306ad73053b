//! The RSVP form record and its editing rules.

use std::fmt;
use std::str::FromStr;

use boda_core::error::DomainError;
use boda_core::validation::{PHONE_DIGITS, digits_only};
use serde::{Deserialize, Serialize};

/// A field of the RSVP form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpField {
    /// Given name.
    Name,
    /// Surname(s).
    Surname,
    /// Free-text list of companions.
    Companions,
    /// Nine-digit phone number.
    Phone,
    /// Contact email.
    Email,
    /// Whether the guest takes the bus service.
    Bus,
    /// Bus pickup stop.
    PickupStop,
    /// Shoe size, for the dance-floor slippers.
    ShoeSize,
    /// Allergies and dietary preferences.
    DietaryNotes,
}

/// Answer to the bus-service question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusChoice {
    /// Takes the bus.
    #[serde(rename = "sí")]
    Yes,
    /// Does not take the bus.
    #[serde(rename = "no")]
    No,
}

impl BusChoice {
    /// The value the form endpoint expects.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "sí",
            Self::No => "no",
        }
    }
}

impl fmt::Display for BusChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sí" | "si" | "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            other => Err(DomainError::Validation(format!(
                "unknown bus choice: {other:?}"
            ))),
        }
    }
}

/// Everything the guest has typed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RsvpForm {
    /// Given name.
    pub name: String,
    /// Surname(s).
    pub surname: String,
    /// Free-text list of companions.
    pub companions: String,
    /// Digits only, at most nine.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// `None` until the guest picks an option.
    pub bus: Option<BusChoice>,
    /// Empty unless `bus` is `Some(BusChoice::Yes)`.
    pub pickup_stop: String,
    /// Shoe size.
    pub shoe_size: String,
    /// Allergies and dietary preferences.
    pub dietary_notes: String,
}

impl RsvpForm {
    /// Sets `field` from raw user input.
    ///
    /// Phone input keeps only its first nine digits. Answering "no" to the
    /// bus question clears the pickup stop; an empty bus value clears the
    /// choice.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `field` is `Bus` and `value` is
    /// not a recognized answer.
    pub fn set(&mut self, field: RsvpField, value: &str) -> Result<(), DomainError> {
        match field {
            RsvpField::Name => value.clone_into(&mut self.name),
            RsvpField::Surname => value.clone_into(&mut self.surname),
            RsvpField::Companions => value.clone_into(&mut self.companions),
            RsvpField::Phone => self.phone = digits_only(value, PHONE_DIGITS),
            RsvpField::Email => value.clone_into(&mut self.email),
            RsvpField::Bus => {
                let choice = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.parse::<BusChoice>()?)
                };
                self.set_bus(choice);
            }
            RsvpField::PickupStop => value.clone_into(&mut self.pickup_stop),
            RsvpField::ShoeSize => value.clone_into(&mut self.shoe_size),
            RsvpField::DietaryNotes => value.clone_into(&mut self.dietary_notes),
        }
        Ok(())
    }

    /// Sets the bus answer, clearing the pickup stop unless it is `Yes`.
    pub fn set_bus(&mut self, choice: Option<BusChoice>) {
        self.bus = choice;
        if choice != Some(BusChoice::Yes) {
            self.pickup_stop.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_bus_no_clears_pickup_stop() {
        // Arrange
        let mut form = RsvpForm::default();
        form.set(RsvpField::Bus, "sí").unwrap();
        form.set(RsvpField::PickupStop, "Vigo").unwrap();

        // Act
        form.set(RsvpField::Bus, "no").unwrap();

        // Assert
        assert_eq!(form.bus, Some(BusChoice::No));
        assert!(form.pickup_stop.is_empty());
    }

    #[test]
    fn test_set_bus_yes_keeps_pickup_stop() {
        let mut form = RsvpForm::default();
        form.set(RsvpField::PickupStop, "Vigo").unwrap();

        form.set(RsvpField::Bus, "si").unwrap();

        assert_eq!(form.bus, Some(BusChoice::Yes));
        assert_eq!(form.pickup_stop, "Vigo");
    }

    #[test]
    fn test_set_phone_keeps_first_nine_digits() {
        let mut form = RsvpForm::default();

        form.set(RsvpField::Phone, "+34 600-123-456 7").unwrap();

        assert_eq!(form.phone, "346001234");
    }

    #[test]
    fn test_set_bus_rejects_unknown_answer() {
        // Arrange
        let mut form = RsvpForm::default();

        // Act
        let result = form.set(RsvpField::Bus, "maybe");

        // Assert
        match result {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("maybe")),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(form.bus, None);
    }

    #[test]
    fn test_set_empty_bus_clears_choice() {
        let mut form = RsvpForm::default();
        form.set(RsvpField::Bus, "sí").unwrap();
        form.set(RsvpField::PickupStop, "Pontevedra").unwrap();

        form.set(RsvpField::Bus, "").unwrap();

        assert_eq!(form.bus, None);
        assert!(form.pickup_stop.is_empty());
    }
}
