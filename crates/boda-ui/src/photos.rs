//! The gallery's photo sequence.

use serde::{Deserialize, Serialize};

/// One gallery photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Stable identifier, starting at 1.
    pub id: u32,
    /// Image location.
    pub src: String,
    /// Alternative text.
    pub alt: String,
    /// Caption under the photo.
    pub caption: Option<String>,
}

const DEFAULT_CAPTIONS: [&str; 9] = [
    "Nuestro primer viaje juntos",
    "En la playa",
    "La pedida",
    "Navidades en familia",
    "Escapada a la montaña",
    "Celebrando juntos",
    "Día especial",
    "Momentos inolvidables",
    "Amor verdadero",
];

/// The nine placeholder photos the site ships with.
#[must_use]
pub fn default_photos() -> Vec<Photo> {
    DEFAULT_CAPTIONS
        .iter()
        .zip(1..)
        .map(|(caption, id)| Photo {
            id,
            src: "/assets/fondo.jpg".into(),
            alt: "Pablo y Vega".into(),
            caption: Some((*caption).to_owned()),
        })
        .collect()
}
