//! Embedded schema migrations for the summary database.
//!
//! Each migration runs at most once. Its SHA-256 is recorded in
//! `schema_version`; if the embedded SQL later changes, the recorded digest
//! no longer matches and opening fails instead of silently diverging.

use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};
use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha256};

/// `(id, sql)` in application order.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_snapshot_counts",
    include_str!("../migrations/001_snapshot_counts.sql"),
)];

const SCHEMA_VERSION_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    migration_id TEXT NOT NULL UNIQUE,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL
)";

fn sql_digest(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

/// Bring the schema up to date.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute(SCHEMA_VERSION_DDL, []).map_err(from_rusqlite)?;
    MIGRATIONS
        .iter()
        .try_for_each(|(id, sql)| apply_one(conn, id, sql))
}

fn apply_one(conn: &mut Connection, id: &str, sql: &str) -> Result<()> {
    let digest = sql_digest(sql);
    let recorded: Option<String> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    if let Some(recorded) = recorded {
        if recorded != digest {
            return Err(checksum_mismatch(id, &recorded, &digest));
        }
        return Ok(());
    }

    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute_batch(sql)
        .map_err(|e| migration_error(id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![id, chrono::Utc::now().timestamp(), digest],
    )
    .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(migration_id = id, "migration applied");
    Ok(())
}
