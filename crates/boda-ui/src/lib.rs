//! Boda UI — presentation state that outlives a single render.
//!
//! Nothing here talks to the network. These are the small state machines
//! behind the gallery lightbox, the scroll-triggered reveal animations, the
//! hero parallax and swipe-to-continue gesture, and the once-per-session
//! splash screen.

pub mod hero;
pub mod lightbox;
pub mod photos;
pub mod reveal;
pub mod splash;
