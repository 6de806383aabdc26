//! `load-sqlite`: upsert every persisted snapshot into the summary table.

use burndown_core::errors::ExResult;
use burndown_store::{db, summary, SnapshotStore};
use std::path::Path;

/// Load all snapshots of `store` into the database at `db_path`.
///
/// # Errors
///
/// `InvalidSnapshot` for an unreadable snapshot (nothing is loaded), or
/// `Persistence` for database failures.
pub fn load_sqlite(store: &SnapshotStore, db_path: &Path) -> ExResult<usize> {
    let snapshots = store.read_all()?;
    let mut conn = db::open(db_path)?;
    db::prepare(&mut conn)?;
    summary::load_snapshots(&mut conn, &snapshots)
}
