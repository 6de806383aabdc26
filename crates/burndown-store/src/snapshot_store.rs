//! Snapshot store: one JSON document per date in a reports directory.
//!
//! File names are derived from `meta.date` (see
//! [`burndown_core::snapshot::snapshot_file_name`]) and sort
//! chronologically, so listing and nearest-date lookup never parse
//! documents they do not return.

use crate::atomic::atomic_write;
use crate::errors::{invalid_snapshot, io_error, snapshot_collision, snapshot_not_found, Result};
use burndown_core::errors::{BurndownError, ExError};
use burndown_core::snapshot::{file_stem, Snapshot};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A lookup bound: a calendar day (inclusive, whole UTC day) or an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotTarget {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl SnapshotTarget {
    /// Latest instant the target admits
    pub fn upper_bound(&self) -> DateTime<Utc> {
        match self {
            SnapshotTarget::Day(day) => {
                let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default();
                Utc.from_utc_datetime(&day.and_time(end))
            }
            SnapshotTarget::Instant(instant) => *instant,
        }
    }
}

impl std::fmt::Display for SnapshotTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotTarget::Day(day) => write!(f, "{}", day),
            SnapshotTarget::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
        }
    }
}

impl FromStr for SnapshotTarget {
    type Err = ExError;

    /// `YYYY-MM-DD` or an RFC 3339 date-time.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let value = value.trim();
        if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Ok(SnapshotTarget::Day(day));
        }
        DateTime::parse_from_rfc3339(value)
            .map(|dt| SnapshotTarget::Instant(dt.with_timezone(&Utc)))
            .map_err(|_| {
                BurndownError::InvalidInput {
                    reason: format!("'{value}' is neither YYYY-MM-DD nor an RFC 3339 date-time"),
                }
                .into()
            })
    }
}

/// Outcome of [`SnapshotStore::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// An identical document was already present
    Unchanged(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written(p) | WriteOutcome::Unchanged(p) => p,
        }
    }
}

pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist a snapshot atomically.
    ///
    /// Writing identical content twice is a no-op; a different document for
    /// the same date is rejected and the existing file is left untouched.
    pub fn write(&self, snapshot: &Snapshot) -> Result<WriteOutcome> {
        let file_name = snapshot.file_name();
        let path = self.dir.join(&file_name);

        let mut content = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| ExError::from(BurndownError::from(e)).with_op("write_snapshot"))?;
        content.push(b'\n');

        if path.exists() {
            let existing = fs::read(&path).map_err(|e| io_error("read_snapshot", e))?;
            if existing == content {
                return Ok(WriteOutcome::Unchanged(path));
            }
            return Err(snapshot_collision(&file_name));
        }

        atomic_write(&path, &content)?;
        tracing::info!(path = %path.display(), "snapshot written");
        Ok(WriteOutcome::Written(path))
    }

    /// Read and validate one snapshot file.
    pub fn read(&self, path: &Path) -> Result<Snapshot> {
        let text = fs::read_to_string(path).map_err(|e| io_error("read_snapshot", e))?;
        serde_json::from_str(&text).map_err(|e| invalid_snapshot(path, e))
    }

    /// Snapshot files, oldest first. A missing directory lists as empty.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list_snapshots", e)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error("list_snapshots", e))?.path();
            if is_snapshot_file(&path) {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    /// The latest snapshot dated at or before `target`.
    ///
    /// # Errors
    ///
    /// `NotFound` ("Snapshot not found for date X") when no snapshot
    /// qualifies.
    pub fn read_nearest_at_or_before(&self, target: &SnapshotTarget) -> Result<Snapshot> {
        let bound = format!("{}.json", file_stem(&target.upper_bound()));
        let nearest = self
            .list()?
            .into_iter()
            .rev()
            .find(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(|n| n <= bound.as_str()));

        match nearest {
            Some(path) => {
                tracing::debug!(path = %path.display(), target = %target, "nearest snapshot");
                self.read(&path)
            }
            None => Err(snapshot_not_found(&target.to_string())),
        }
    }

    /// Every snapshot, oldest first
    pub fn read_all(&self) -> Result<Vec<Snapshot>> {
        self.list()?.iter().map(|p| self.read(p)).collect()
    }
}

/// `<digits>T<digits>Z.json`, the shape produced by `snapshot_file_name`.
fn is_snapshot_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let Some(stem) = name.strip_suffix(".json") else {
        return false;
    };
    stem.len() == 19
        && stem.ends_with('Z')
        && stem.as_bytes().get(8) == Some(&b'T')
        && stem
            .chars()
            .enumerate()
            .all(|(i, c)| i == 8 || i == 18 || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parsing() {
        let day: SnapshotTarget = "2024-01-10".parse().unwrap();
        assert_eq!(day.to_string(), "2024-01-10");
        assert_eq!(
            file_stem(&day.upper_bound()),
            "20240110T235959999Z"
        );

        let instant: SnapshotTarget = "2024-01-10T12:00:00+01:00".parse().unwrap();
        assert_eq!(file_stem(&instant.upper_bound()), "20240110T110000000Z");

        assert!("last tuesday".parse::<SnapshotTarget>().is_err());
    }

    #[test]
    fn test_snapshot_file_shape() {
        assert!(is_snapshot_file(Path::new("/r/20240108T000000000Z.json")));
        assert!(!is_snapshot_file(Path::new("/r/20240108T000000000Z.tmp")));
        assert!(!is_snapshot_file(Path::new("/r/notes.json")));
        assert!(!is_snapshot_file(Path::new("/r/2024010800000000000Z.json")));
    }
}
