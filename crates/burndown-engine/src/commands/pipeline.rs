//! One report run.
//!
//! ## Steps (in order):
//! 1. Resolve and load the corpora for the report date
//! 2. Mine documentation citations (cached by content commit)
//! 3. Build the inventory
//! 4. Resolve a baseline for every compat key
//! 5. Assemble the snapshot
//!
//! Nothing is written here; any failure aborts the run before a snapshot
//! exists.

use crate::ports::CorpusResolver;
use burndown_core::baseline::{BaselineResolver, BcdSupportEvaluator};
use burndown_core::cache::KvCache;
use burndown_core::errors::ExResult;
use burndown_core::inventory_builder::{build_inventory, InventoryInputs};
use burndown_core::model::{BaselineResult, Inventory};
use burndown_core::snapshot::Snapshot;
use burndown_core::sources::traffic::DEFAULT_TOP_N;
use burndown_core::sources::{
    BcdAdapter, ContentMiningAdapter, ContentRepository, KeyFilter, TrafficRanking, DEFAULT_ROOTS,
};
use burndown_core::{log_op_end, log_op_error, log_op_start};
use burndown_core_types::{RunContext, RunId};
use chrono::{DateTime, FixedOffset};
use std::time::Instant;

/// Knobs that shape a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Compat corpus root categories to walk
    pub roots: Vec<String>,
    pub filter: KeyFilter,
    /// Number of top-ranked pages counted as high traffic
    pub top_n: usize,
    /// Store the full compat key list rather than its count
    pub list_keys: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            roots: DEFAULT_ROOTS.iter().map(|r| r.to_string()).collect(),
            filter: KeyFilter::default(),
            top_n: DEFAULT_TOP_N,
            list_keys: true,
        }
    }
}

/// Ports a run reads from.
pub struct PipelinePorts<'a> {
    pub corpora: &'a mut dyn CorpusResolver,
    pub content: &'a dyn ContentRepository,
    pub content_cache: &'a mut dyn KvCache,
    /// `None` when no traffic ranking is configured
    pub traffic: Option<&'a TrafficRanking>,
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub run_id: RunId,
    pub snapshot: Snapshot,
    pub inventory: Inventory,
    pub baselines: Vec<BaselineResult>,
}

/// Run the pipeline for `date`.
///
/// # Errors
///
/// Any port failure, a fatal baseline evaluation failure, or a malformed
/// content cache entry.
pub fn run_pipeline(
    ctx: &RunContext,
    date: DateTime<FixedOffset>,
    ports: &mut PipelinePorts<'_>,
    options: &PipelineOptions,
) -> ExResult<PipelineOutput> {
    let start = Instant::now();
    log_op_start!(
        "run_pipeline",
        run_id = %ctx.run_id,
        label = ctx.label.as_deref(),
        report_date = %date.to_rfc3339()
    );

    match build(date, ports, options) {
        Ok((snapshot, inventory, baselines)) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            log_op_end!(
                "run_pipeline",
                duration_ms = duration_ms,
                run_id = %ctx.run_id,
                key_count = inventory.entries.len()
            );
            Ok(PipelineOutput {
                run_id: ctx.run_id,
                snapshot,
                inventory,
                baselines,
            })
        }
        Err(e) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            log_op_error!(
                "run_pipeline",
                e.clone(),
                duration_ms = duration_ms,
                run_id = %ctx.run_id
            );
            Err(e)
        }
    }
}

fn build(
    date: DateTime<FixedOffset>,
    ports: &mut PipelinePorts<'_>,
    options: &PipelineOptions,
) -> ExResult<(Snapshot, Inventory, Vec<BaselineResult>)> {
    let corpora = ports.corpora.resolve(&date)?;

    let citations = ContentMiningAdapter::new(ports.content, &mut *ports.content_cache)
        .citations(&corpora.mdn_content_commit)?;

    let compat = BcdAdapter::new(&corpora.bcd, options.roots.clone(), options.filter);
    let inventory = build_inventory(&InventoryInputs {
        compat: &compat,
        catalog: &corpora.catalog,
        caniuse: &corpora.caniuse,
        content: &citations,
        traffic: ports.traffic,
        top_n: options.top_n,
    });

    let evaluator = BcdSupportEvaluator::new(&corpora.bcd, date.date_naive());
    let baselines = BaselineResolver::new(&evaluator, &corpora.bcd).resolve_all(inventory.keys())?;

    let snapshot = Snapshot::from_parts(
        date,
        corpora.refs(),
        &inventory,
        Some(&baselines),
        options.list_keys,
    );
    Ok((snapshot, inventory, baselines))
}
