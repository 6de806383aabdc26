//! `generate-report`: run the pipeline, persist the snapshot, and compare
//! it with the latest earlier snapshot.
//!
//! A missing earlier snapshot is the first scheduled run, not an error.

use crate::commands::pipeline::{run_pipeline, PipelineOptions, PipelineOutput, PipelinePorts};
use crate::ports::Clock;
use burndown_core::diff::{compute_delta, Delta};
use burndown_core::errors::{ExErrorKind, ExResult};
use burndown_core::snapshot::Snapshot;
use burndown_core_types::RunContext;
use burndown_store::{SnapshotStore, SnapshotTarget, WriteOutcome};
use chrono::{DateTime, Duration, FixedOffset, Utc};

/// Result of one generated report.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub output: PipelineOutput,
    pub written: WriteOutcome,
    /// `None` on the first run
    pub previous: Option<Snapshot>,
    /// Comparison with `previous`
    pub delta: Option<Delta>,
}

/// Generate the report for "now" as told by `clock`.
///
/// # Errors
///
/// See [`generate_report_at`].
pub fn generate_report(
    store: &SnapshotStore,
    clock: &dyn Clock,
    ports: &mut PipelinePorts<'_>,
    options: &PipelineOptions,
) -> ExResult<GenerateOutcome> {
    generate_report_at(store, clock.now(), &RunContext::new(), ports, options)
}

/// Generate the report for `date`.
///
/// # Errors
///
/// - Any pipeline failure (nothing is written)
/// - `AlreadyExists` if a different snapshot is persisted for `date`
/// - `InvalidSnapshot` if the earlier snapshot cannot be read
pub fn generate_report_at(
    store: &SnapshotStore,
    date: DateTime<FixedOffset>,
    ctx: &RunContext,
    ports: &mut PipelinePorts<'_>,
    options: &PipelineOptions,
) -> ExResult<GenerateOutcome> {
    let output = run_pipeline(ctx, date, ports, options)?;

    let previous = previous_snapshot(store, &date)?;
    let written = store.write(&output.snapshot)?;
    let delta = previous
        .as_ref()
        .map(|before| compute_delta(before, &output.snapshot))
        .transpose()?;

    Ok(GenerateOutcome {
        output,
        written,
        previous,
        delta,
    })
}

/// Latest snapshot strictly before `date`.
fn previous_snapshot(store: &SnapshotStore, date: &DateTime<FixedOffset>) -> ExResult<Option<Snapshot>> {
    let bound = date.with_timezone(&Utc) - Duration::milliseconds(1);
    match store.read_nearest_at_or_before(&SnapshotTarget::Instant(bound)) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(e) if e.kind() == ExErrorKind::NotFound => {
            tracing::info!(
                report_date = %date.to_rfc3339(),
                "no earlier snapshot; producing the initial report"
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
