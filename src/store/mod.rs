//! Persistence boundary.
//!
//! The tracker talks to a plain key-value store: string keys, JSON string
//! values. State is loaded once at startup and written back after every
//! mutating operation; nothing else reads or writes persistence.

pub mod codec;
pub mod sqlite;

pub use sqlite::SqliteStore;

use std::collections::HashMap;

use anyhow::Result;

/// Storage keys. `CURRENT_ACTIVITY` holds the bare activity tag (not JSON)
/// so hosts can read it without decoding the open entry.
pub mod keys {
    pub const TIME_ENTRIES: &str = "time_entries";
    pub const HOLIDAY_ENTRIES: &str = "holiday_entries";
    pub const CURRENT_ENTRY: &str = "current_entry";
    pub const CURRENT_ACTIVITY: &str = "current_activity";
}

pub trait KvStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }
}
