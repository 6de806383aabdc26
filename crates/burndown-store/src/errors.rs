//! Error handling for burndown-store
//!
//! Wraps burndown-core ExError with store-specific helpers

use burndown_core::errors::{BurndownError, ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// A snapshot for this date already exists with other content
pub fn snapshot_collision(file_name: &str) -> ExError {
    ExError::from(BurndownError::SnapshotDateCollision {
        date: file_name.to_string(),
    })
    .with_op("write_snapshot")
}

pub fn snapshot_not_found(date: &str) -> ExError {
    ExError::from(BurndownError::SnapshotNotFound {
        date: date.to_string(),
    })
    .with_op("read_snapshot")
}

pub fn invalid_snapshot(path: &Path, reason: impl ToString) -> ExError {
    ExError::from(BurndownError::InvalidSnapshot {
        path: path.display().to_string(),
        reason: reason.to_string(),
    })
    .with_op("read_snapshot")
}

pub fn malformed_cache(path: &Path, reason: impl ToString) -> ExError {
    ExError::from(BurndownError::MalformedCache {
        path: path.display().to_string(),
        reason: reason.to_string(),
    })
    .with_op("open_cache")
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
