//! Snapshot summary table.
//!
//! One row per snapshot in `snapshot_counts`, keyed by the snapshot's file
//! stem, so the series can be charted with any SQL client. Loading the same
//! snapshot again overwrites its row with identical values.

use crate::errors::{from_rusqlite, Result};
use burndown_core::snapshot::{file_stem, Snapshot};
use chrono::Utc;
use rusqlite::{params, Connection};

/// A row of `snapshot_counts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub snapshot_id: String,
    pub report_day: String,
    pub compat_keys: i64,
    pub feature_ids: i64,
    pub caniuse_ids: i64,
    pub doc_cited_keys: i64,
    pub top_traffic_cited_keys: Option<i64>,
    pub feature_cited_keys: i64,
    pub baseline_low: Option<i64>,
}

/// Upsert every snapshot in one transaction; returns the number written.
pub fn load_snapshots(conn: &mut Connection, snapshots: &[Snapshot]) -> Result<usize> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    for snapshot in snapshots {
        upsert_snapshot(&tx, snapshot)?;
    }
    tx.commit().map_err(from_rusqlite)?;
    tracing::info!(snapshot_count = snapshots.len(), "snapshot summaries loaded");
    Ok(snapshots.len())
}

fn upsert_snapshot(conn: &Connection, snapshot: &Snapshot) -> Result<()> {
    let counts = snapshot.counts();
    let refs = &snapshot.meta.refs;
    let as_i64 = |n: usize| n as i64;
    let baseline = counts.baseline.as_ref();

    conn.execute(
        "INSERT INTO snapshot_counts (
            snapshot_id, snapshot_date, report_day,
            bcd_commit_hash, web_features_version, caniuse_version, mdn_content_commit_hash,
            compat_keys, feature_ids, caniuse_ids, doc_cited_keys, top_traffic_cited_keys,
            feature_cited_keys, feature_caniuse_ids,
            baseline_low, baseline_high, baseline_never, baseline_unresolved
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
        ON CONFLICT(snapshot_id) DO UPDATE SET
            snapshot_date = excluded.snapshot_date,
            report_day = excluded.report_day,
            bcd_commit_hash = excluded.bcd_commit_hash,
            web_features_version = excluded.web_features_version,
            caniuse_version = excluded.caniuse_version,
            mdn_content_commit_hash = excluded.mdn_content_commit_hash,
            compat_keys = excluded.compat_keys,
            feature_ids = excluded.feature_ids,
            caniuse_ids = excluded.caniuse_ids,
            doc_cited_keys = excluded.doc_cited_keys,
            top_traffic_cited_keys = excluded.top_traffic_cited_keys,
            feature_cited_keys = excluded.feature_cited_keys,
            feature_caniuse_ids = excluded.feature_caniuse_ids,
            baseline_low = excluded.baseline_low,
            baseline_high = excluded.baseline_high,
            baseline_never = excluded.baseline_never,
            baseline_unresolved = excluded.baseline_unresolved",
        params![
            file_stem(&snapshot.meta.date.with_timezone(&Utc)),
            snapshot.meta.date.to_rfc3339(),
            snapshot.meta.date.date_naive().to_string(),
            refs.browser_compat_data_commit_hash,
            refs.web_features_version,
            refs.caniuse_version,
            refs.mdn_content_commit_hash,
            as_i64(counts.compat_keys),
            as_i64(counts.feature_ids),
            as_i64(counts.caniuse_ids),
            as_i64(counts.doc_cited_keys),
            counts.top_traffic_cited_keys.map(as_i64),
            as_i64(counts.feature_cited_keys),
            as_i64(counts.feature_caniuse_ids),
            baseline.map(|b| as_i64(b.low)),
            baseline.map(|b| as_i64(b.high)),
            baseline.map(|b| as_i64(b.never)),
            baseline.map(|b| as_i64(b.unresolved)),
        ],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

/// All rows, oldest first
pub fn read_rows(conn: &Connection) -> Result<Vec<SummaryRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT snapshot_id, report_day, compat_keys, feature_ids, caniuse_ids,
                    doc_cited_keys, top_traffic_cited_keys, feature_cited_keys, baseline_low
             FROM snapshot_counts ORDER BY snapshot_id",
        )
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(SummaryRow {
                snapshot_id: row.get(0)?,
                report_day: row.get(1)?,
                compat_keys: row.get(2)?,
                feature_ids: row.get(3)?,
                caniuse_ids: row.get(4)?,
                doc_cited_keys: row.get(5)?,
                top_traffic_cited_keys: row.get(6)?,
                feature_cited_keys: row.get(7)?,
                baseline_low: row.get(8)?,
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}
