//! Key-value store abstraction for persisted flags.
//!
//! The flows never touch ambient browser-style storage. A store is injected
//! instead: [`JsonFileStore`] survives restarts (local scope), while
//! [`MemoryStore`] lives as long as the process (session scope).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::DomainError;

/// Value written for boolean flags.
pub const FLAG_SET: &str = "true";

/// Small string-to-string store.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Removes `key` if present.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), DomainError>;

    /// Returns whether a flag has been set under `key`.
    ///
    /// Any stored value counts as set.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the backend cannot be read.
    fn is_flag_set(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get(key)?.is_some())
    }

    /// Sets a flag under `key`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the backend cannot be written.
    fn set_flag(&self, key: &str) -> Result<(), DomainError> {
        self.set(key, FLAG_SET)
    }
}

fn lock_entries(
    entries: &Mutex<HashMap<String, String>>,
) -> Result<MutexGuard<'_, HashMap<String, String>>, DomainError> {
    entries
        .lock()
        .map_err(|_| DomainError::Storage("store lock poisoned".into()))
}

/// In-memory store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(lock_entries(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        lock_entries(&self.entries)?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        lock_entries(&self.entries)?.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object on disk.
///
/// The whole map is rewritten on every mutation; the store only ever holds a
/// handful of flags.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the file exists but cannot be read
    /// or does not contain a JSON object of strings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                DomainError::Storage(format!("corrupt store {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(DomainError::Storage(format!(
                    "cannot read store {}: {e}",
                    path.display()
                )));
            }
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened json file store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), DomainError> {
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| DomainError::Storage(format!("store serialization failed: {e}")))?;
        std::fs::write(&self.path, contents).map_err(|e| {
            DomainError::Storage(format!("cannot write store {}: {e}", self.path.display()))
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(lock_entries(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut entries = lock_entries(&self.entries)?;
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        let mut entries = lock_entries(&self.entries)?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

/// View of another store with every key namespaced under a prefix.
///
/// Used to give each visitor their own flags inside one shared backend.
#[derive(Clone)]
pub struct PrefixedStore {
    inner: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl PrefixedStore {
    /// Creates a view of `inner` whose keys are stored as `{prefix}:{key}`.
    #[must_use]
    pub fn new(inner: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}:{key}", self.prefix)
    }
}

impl std::fmt::Debug for PrefixedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixedStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl KeyValueStore for PrefixedStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.inner.get(&self.scoped(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.inner.set(&self.scoped(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.inner.remove(&self.scoped(key))
    }
}
