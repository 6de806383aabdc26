//! JSON file key-value cache.
//!
//! The whole file is loaded on open and rewritten atomically on flush, so an
//! interrupted flush leaves the previous entries intact. Two on-disk forms
//! are accepted: an object (`{"<key>": <value>}`) and an array of pairs
//! (`[["<key>", <value>], ...]`); flush always writes the object form.

use crate::atomic::atomic_write;
use crate::errors::{io_error, malformed_cache, Result};
use burndown_core::cache::KvCache;
use burndown_core::errors::{BurndownError, ExError, ExResult};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct JsonFileCache {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
    dirty: bool,
}

impl JsonFileCache {
    /// Load the cache at `path`; a missing file is an empty cache.
    ///
    /// # Errors
    ///
    /// `MalformedCache` if the file exists but is not one of the accepted
    /// forms. The file is never discarded silently.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => parse_entries(&path, &text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "cache file not found; starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(io_error("open_cache", e)),
        };
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entries(path: &Path, text: &str) -> Result<BTreeMap<String, Value>> {
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let value: Value = serde_json::from_str(text).map_err(|e| malformed_cache(path, e))?;
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Array(pairs) => pairs
            .into_iter()
            .map(|pair| match pair {
                Value::Array(mut kv) if kv.len() == 2 => {
                    let value = kv.pop().unwrap_or(Value::Null);
                    match kv.pop() {
                        Some(Value::String(key)) => Ok((key, value)),
                        _ => Err(malformed_cache(path, "pair key must be a string")),
                    }
                }
                _ => Err(malformed_cache(path, "expected [key, value] pairs")),
            })
            .collect(),
        _ => Err(malformed_cache(path, "expected an object or an array of pairs")),
    }
}

impl KvCache for JsonFileCache {
    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn put(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
        self.dirty = true;
    }

    fn flush(&mut self) -> ExResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut content = serde_json::to_vec_pretty(&Value::Object(object))
            .map_err(|e| ExError::from(BurndownError::from(e)).with_op("flush_cache"))?;
        content.push(b'\n');
        atomic_write(&self.path, &content)?;
        self.dirty = false;
        tracing::debug!(path = %self.path.display(), entries = self.entries.len(), "cache flushed");
        Ok(())
    }
}
