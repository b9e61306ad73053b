//! Per-step validation of the RSVP form.

use boda_core::validation::{FieldErrors, is_blank, is_valid_email, is_valid_phone};

use super::form::{BusChoice, RsvpField, RsvpForm};
use super::steps::RsvpStep;

/// Errors keyed by the field they belong to.
pub type RsvpErrors = FieldErrors<RsvpField>;

/// Checks the identity step: name, surname, phone and email.
#[must_use]
pub fn validate_identity(form: &RsvpForm) -> RsvpErrors {
    let mut errors = RsvpErrors::new();

    if is_blank(&form.name) {
        errors.insert(RsvpField::Name, "Nombre requerido");
    }
    if is_blank(&form.surname) {
        errors.insert(RsvpField::Surname, "Apellidos requeridos");
    }
    if is_blank(&form.phone) {
        errors.insert(RsvpField::Phone, "Teléfono requerido");
    } else if !is_valid_phone(&form.phone) {
        errors.insert(RsvpField::Phone, "Teléfono inválido (9 dígitos)");
    }
    if is_blank(&form.email) {
        errors.insert(RsvpField::Email, "Email requerido");
    } else if !is_valid_email(&form.email) {
        errors.insert(RsvpField::Email, "Email inválido");
    }

    errors
}

/// Checks the logistics step: a bus answer, and a known pickup stop when
/// the answer is yes.
#[must_use]
pub fn validate_logistics(form: &RsvpForm, bus_stops: &[String]) -> RsvpErrors {
    let mut errors = RsvpErrors::new();

    match form.bus {
        None => errors.insert(RsvpField::Bus, "Selecciona una opción"),
        Some(BusChoice::Yes) if form.pickup_stop.is_empty() => {
            errors.insert(RsvpField::PickupStop, "Selecciona una parada");
        }
        Some(BusChoice::Yes) if !bus_stops.iter().any(|s| *s == form.pickup_stop) => {
            errors.insert(RsvpField::PickupStop, "Parada no disponible");
        }
        Some(_) => {}
    }

    errors
}

/// Checks whichever step the guest is on.
#[must_use]
pub fn validate_step(step: RsvpStep, form: &RsvpForm, bus_stops: &[String]) -> RsvpErrors {
    match step {
        RsvpStep::Identity => validate_identity(form),
        RsvpStep::Logistics => validate_logistics(form, bus_stops),
        RsvpStep::Confirmation => RsvpErrors::new(),
    }
}
