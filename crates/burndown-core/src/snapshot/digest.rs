//! Snapshot digests.
//!
//! - **Full digest**: SHA-256 of the canonical JSON form
//! - **Semantic digest**: same, with `meta.date` blanked, so two snapshots
//!   computed from identical data on different days share it
//!
//! Canonical form is `serde_json` compact output of the typed snapshot,
//! which has a fixed field order.

use crate::errors::Result;
use crate::snapshot::report::Snapshot;
use sha2::{Digest, Sha256};

/// Digest of the whole snapshot.
///
/// # Errors
///
/// `Serialization` if the snapshot cannot be serialized.
pub fn compute_snapshot_digest(snapshot: &Snapshot) -> Result<String> {
    let canonical = serde_json::to_string(snapshot)?;
    Ok(hash_string(&canonical))
}

/// Digest excluding `meta.date`.
///
/// # Errors
///
/// `Serialization` if the snapshot cannot be serialized.
pub fn compute_semantic_digest(snapshot: &Snapshot) -> Result<String> {
    let mut value = serde_json::to_value(snapshot)?;
    if let Some(meta) = value.get_mut("meta").and_then(|m| m.as_object_mut()) {
        meta.remove("date");
    }
    let canonical = serde_json::to_string(&value)?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
