//! Wire payload sent to the attendance endpoint.

use serde::Serialize;

use super::form::RsvpForm;

/// The attendance record as the form endpoint stores it.
#[derive(Debug, Serialize)]
pub struct RsvpPayload<'a> {
    nombre: &'a str,
    apellidos: &'a str,
    acompanantes: &'a str,
    telefono: &'a str,
    email: &'a str,
    bus: &'static str,
    parada: &'a str,
    talla: &'a str,
    preferencias: &'a str,
}

impl<'a> From<&'a RsvpForm> for RsvpPayload<'a> {
    fn from(form: &'a RsvpForm) -> Self {
        Self {
            nombre: &form.name,
            apellidos: &form.surname,
            acompanantes: &form.companions,
            telefono: &form.phone,
            email: &form.email,
            bus: form.bus.map_or("", |choice| choice.as_str()),
            parada: &form.pickup_stop,
            talla: &form.shoe_size,
            preferencias: &form.dietary_notes,
        }
    }
}
