//! Boda Forms — the two single-step forms.
//!
//! The pre-wedding party form (name, attendance, companions) and the music
//! suggestion form (song, artist, who suggests it). Each validates locally
//! and posts one payload to its form endpoint.

pub mod music;
pub mod preboda;
pub mod settings;
