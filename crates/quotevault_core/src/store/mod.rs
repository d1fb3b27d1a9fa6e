//! Key-value persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the `get`/`set` contract shared by durable and session stores.
//! - Provide an in-process store and a SQLite-backed durable store.
//!
//! # Invariants
//! - `set` is synchronous: once it returns `Ok`, a following `get` on the
//!   same store observes the new value.
//! - Stores hold opaque strings; callers own encoding and decoding.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod schema;
mod sqlite_store;

pub use sqlite_store::SqliteStore;

/// Durable key holding the full quote collection as JSON.
pub const QUOTES_KEY: &str = "quotes";
/// Durable key holding the selected category filter as a plain string.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Session key holding the last displayed quote as JSON.
pub const LAST_VIEWED_QUOTE_KEY: &str = "lastViewedQuote";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store access failure.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// The store file was written with a newer layout than this build knows.
    UnsupportedSchema { found: u32, supported: u32 },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "store access failed: {err}"),
            Self::UnsupportedSchema { found, supported } => write!(
                f,
                "quote store layout version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// String key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// In-process store.
///
/// Clones share the same entries, so a caller can keep a handle to a store
/// that has been moved into a repository or service. Used as the session
/// store: `clear` models the end of a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryStore};

    #[test]
    fn memory_store_roundtrip_and_clear() {
        let store = MemoryStore::new();
        assert_eq!(store.get("quotes").unwrap(), None);

        store.set("quotes", "[]").unwrap();
        store.set("quotes", "[1]").unwrap();
        assert_eq!(store.get("quotes").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get("quotes").unwrap(), None);
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.set("selectedCategory", "Life").unwrap();
        assert_eq!(
            handle.get("selectedCategory").unwrap().as_deref(),
            Some("Life")
        );
    }
}
