//! Comparison of two persisted snapshots (`print-report`).
//!
//! Unlike scheduled generation, a missing snapshot is fatal here.

use burndown_core::csv::Delim;
use burndown_core::diff::{compute_delta, Delta};
use burndown_core::errors::ExResult;
use burndown_core::render::{render_report, render_rows_text};
use burndown_core::{log_op_end, log_op_error, log_op_start};
use burndown_store::{SnapshotStore, SnapshotTarget};
use std::time::Instant;

/// Output form of `print-report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Aligned tables plus the summary line
    #[default]
    Text,
    /// Flat rows for spreadsheet paste
    Rows(Delim),
    /// The delta itself, as JSON
    Json,
}

/// Delta between the nearest snapshots at or before `from` and `to`.
///
/// # Errors
///
/// `NotFound` ("Snapshot not found for date X") when either side has no
/// snapshot; `InvalidSnapshot` when one cannot be read.
pub fn compare_snapshots(
    store: &SnapshotStore,
    from: &SnapshotTarget,
    to: &SnapshotTarget,
) -> ExResult<Delta> {
    let start = Instant::now();
    log_op_start!("compare_snapshots", from = %from, to = %to);

    let result = (|| -> ExResult<Delta> {
        let before = store.read_nearest_at_or_before(from)?;
        let after = store.read_nearest_at_or_before(to)?;
        Ok(compute_delta(&before, &after)?)
    })();

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(delta) => {
            log_op_end!(
                "compare_snapshots",
                duration_ms = duration_ms,
                elapsed_days = delta.elapsed_days
            );
            Ok(delta)
        }
        Err(e) => {
            log_op_error!("compare_snapshots", e.clone(), duration_ms = duration_ms);
            Err(e)
        }
    }
}

/// Render the comparison of `from` and `to` in `format`.
///
/// # Errors
///
/// See [`compare_snapshots`]; `Serialization` for the JSON form.
pub fn print_report(
    store: &SnapshotStore,
    from: &SnapshotTarget,
    to: &SnapshotTarget,
    format: ReportFormat,
) -> ExResult<String> {
    let delta = compare_snapshots(store, from, to)?;
    Ok(match format {
        ReportFormat::Text => render_report(&delta),
        ReportFormat::Rows(delim) => render_rows_text(&delta, delim),
        ReportFormat::Json => {
            let mut text = serde_json::to_string_pretty(&delta)
                .map_err(burndown_core::errors::BurndownError::from)?;
            text.push('\n');
            text
        }
    })
}
