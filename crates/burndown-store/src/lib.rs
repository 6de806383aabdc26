//! Burndown Store - filesystem and SQLite persistence
//!
//! Provides:
//! - Atomic temp→rename writes
//! - The snapshot store (one JSON document per date)
//! - A JSON file key-value cache for the adapter caches
//! - The SQLite summary table loader with embedded migrations

pub mod atomic;
pub mod db;
pub mod errors;
pub mod file_cache;
pub mod migrations;
pub mod snapshot_store;
pub mod summary;

// Re-export key types
pub use errors::Result;
pub use file_cache::JsonFileCache;
pub use snapshot_store::{SnapshotStore, SnapshotTarget, WriteOutcome};
