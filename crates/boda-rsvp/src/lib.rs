//! Boda RSVP — attendance confirmation flow.
//!
//! Collects identity and contact details, then logistics (bus service,
//! pickup stop, shoe size, dietary notes), validates each step and posts the
//! whole record to the form endpoint.

pub mod application;
pub mod domain;
pub mod settings;
