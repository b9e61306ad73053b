//! Gallery lightbox.
//!
//! `Closed` or `Open(index)` over a fixed number of photos. While open the
//! lightbox holds a keyboard listener and a page scroll lock; both are
//! released the moment it closes or is dropped.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use boda_core::error::DomainError;
use serde::Serialize;
use tracing::debug;

/// Page-wide registry of live keyboard listeners.
#[derive(Debug, Clone, Default)]
pub struct KeyboardHub {
    live: Arc<AtomicUsize>,
}

impl KeyboardHub {
    /// Creates a hub with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener; it stays registered until the guard drops.
    #[must_use]
    pub fn subscribe(&self) -> KeyListener {
        self.live.fetch_add(1, Ordering::SeqCst);
        KeyListener {
            live: Arc::clone(&self.live),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn active_listeners(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Registration handle returned by [`KeyboardHub::subscribe`].
#[derive(Debug)]
pub struct KeyListener {
    live: Arc<AtomicUsize>,
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Page scroll, locked while any guard is alive.
#[derive(Debug, Clone, Default)]
pub struct PageScroll {
    holders: Arc<AtomicUsize>,
}

impl PageScroll {
    /// Creates an unlocked page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks scrolling until the guard drops.
    #[must_use]
    pub fn lock(&self) -> ScrollLock {
        self.holders.fetch_add(1, Ordering::SeqCst);
        ScrollLock {
            holders: Arc::clone(&self.holders),
        }
    }

    /// Whether anything holds the lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.holders.load(Ordering::SeqCst) > 0
    }
}

/// Guard returned by [`PageScroll::lock`].
#[derive(Debug)]
pub struct ScrollLock {
    holders: Arc<AtomicUsize>,
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Keys the lightbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxKey {
    /// Closes the lightbox.
    Escape,
    /// Previous photo.
    ArrowLeft,
    /// Next photo.
    ArrowRight,
}

impl FromStr for LightboxKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Escape" => Ok(Self::Escape),
            "ArrowLeft" => Ok(Self::ArrowLeft),
            "ArrowRight" => Ok(Self::ArrowRight),
            other => Err(DomainError::Validation(format!(
                "key {other:?} is not bound"
            ))),
        }
    }
}

/// Observable state of the lightbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum LightboxState {
    /// Not showing.
    Closed,
    /// Showing the photo at this index.
    Open(usize),
}

#[derive(Debug)]
struct OpenView {
    index: usize,
    _keys: KeyListener,
    _scroll: ScrollLock,
}

/// The lightbox over a sequence of `len` photos.
#[derive(Debug)]
pub struct Lightbox {
    len: usize,
    keyboard: KeyboardHub,
    scroll: PageScroll,
    open: Option<OpenView>,
}

impl Lightbox {
    /// Creates a closed lightbox over `len` photos.
    #[must_use]
    pub fn new(len: usize, keyboard: KeyboardHub, scroll: PageScroll) -> Self {
        Self {
            len,
            keyboard,
            scroll,
            open: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LightboxState {
        self.open
            .as_ref()
            .map_or(LightboxState::Closed, |view| LightboxState::Open(view.index))
    }

    /// Shows the photo at `index`, opening the lightbox if needed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `index` is out of range.
    pub fn open(&mut self, index: usize) -> Result<(), DomainError> {
        if index >= self.len {
            return Err(DomainError::Validation(format!(
                "photo {index} does not exist; gallery has {}",
                self.len
            )));
        }
        match &mut self.open {
            Some(view) => view.index = index,
            None => {
                self.open = Some(OpenView {
                    index,
                    _keys: self.keyboard.subscribe(),
                    _scroll: self.scroll.lock(),
                });
                debug!(index, "lightbox opened");
            }
        }
        Ok(())
    }

    /// Closes the lightbox and releases its listener and scroll lock.
    pub fn close(&mut self) {
        if self.open.take().is_some() {
            debug!("lightbox closed");
        }
    }

    /// Moves to the next photo, wrapping after the last.
    pub fn next(&mut self) -> LightboxState {
        let len = self.len;
        if let Some(view) = &mut self.open {
            view.index = (view.index + 1) % len;
        }
        self.state()
    }

    /// Moves to the previous photo, wrapping before the first.
    pub fn previous(&mut self) -> LightboxState {
        let len = self.len;
        if let Some(view) = &mut self.open {
            view.index = (view.index + len - 1) % len;
        }
        self.state()
    }

    /// Applies a key press; returns whether it was handled.
    ///
    /// Keys are ignored while closed.
    pub fn handle_key(&mut self, key: LightboxKey) -> bool {
        if self.open.is_none() {
            return false;
        }
        match key {
            LightboxKey::Escape => self.close(),
            LightboxKey::ArrowLeft => {
                self.previous();
            }
            LightboxKey::ArrowRight => {
                self.next();
            }
        }
        true
    }
}
