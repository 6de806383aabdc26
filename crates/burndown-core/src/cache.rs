//! Key-value cache port.
//!
//! Adapters that do expensive work keyed by an immutable reference (a
//! commit hash) receive a cache explicitly. Entries are never invalidated:
//! a hit for a given key is trusted as-is. `flush` persists pending
//! entries; file-backed implementations rewrite the whole file atomically.

use crate::errors::ExResult;
use serde_json::Value;
use std::collections::BTreeMap;

pub trait KvCache {
    fn get(&self, key: &str) -> Option<&Value>;

    fn put(&mut self, key: String, value: Value);

    /// Persist pending entries.
    ///
    /// # Errors
    ///
    /// Implementation-specific persistence failures.
    fn flush(&mut self) -> ExResult<()>;
}

/// Process-local cache, used in tests and for runs without a cache directory.
#[derive(Debug, Default, Clone)]
pub struct MemoryCache {
    entries: BTreeMap<String, Value>,
    flushes: usize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of `flush` calls so far
    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl KvCache for MemoryCache {
    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn put(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    fn flush(&mut self) -> ExResult<()> {
        self.flushes += 1;
        Ok(())
    }
}
