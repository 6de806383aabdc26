//! Burndown listings: what the feature catalog does not cover yet.

use crate::model::{BaselineResult, CaniuseId, CompatKey, Inventory};
use chrono::NaiveDate;
use std::collections::HashMap;

pub const COMPAT_BURNDOWN_HEADER: [&str; 9] = [
    "key",
    "cited_by_docs",
    "cited_by_top_traffic",
    "baseline_low",
    "baseline_high",
    "engine_count",
    "last_introduced",
    "deprecated",
    "standard_track",
];

pub const CANIUSE_BURNDOWN_HEADER: [&str; 2] = ["id", "added"];

/// A support-matrix id with the date it first appeared in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaniuseAddition {
    pub id: CaniuseId,
    pub added: Option<NaiveDate>,
}

/// One row per compat key not cited by any feature, in walk order.
///
/// Keys without a baseline result get empty baseline cells; an absent
/// top-traffic flag prints as an empty cell, not `false`.
pub fn compat_burndown_rows(inventory: &Inventory, baselines: &[BaselineResult]) -> Vec<Vec<String>> {
    let by_key: HashMap<&CompatKey, &BaselineResult> = baselines.iter().map(|b| (&b.key, b)).collect();
    crate::inventory_builder::uncited_by_features(inventory)
        .into_iter()
        .map(|entry| {
            let baseline = by_key.get(&entry.key);
            vec![
                entry.key.to_string(),
                entry.cited_by_docs.to_string(),
                entry
                    .cited_by_top_traffic
                    .map(|b| b.to_string())
                    .unwrap_or_default(),
                baseline.map(|b| b.low.to_string()).unwrap_or_default(),
                baseline.map(|b| b.high.to_string()).unwrap_or_default(),
                baseline.map(|b| b.engine_count.to_string()).unwrap_or_default(),
                baseline
                    .and_then(|b| b.last_introduced)
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                baseline.map(|b| b.deprecated.to_string()).unwrap_or_default(),
                baseline.map(|b| b.standard_track.to_string()).unwrap_or_default(),
            ]
        })
        .collect()
}

/// Rows oldest addition first; undated ids last, then by id.
pub fn caniuse_burndown_rows(additions: &[CaniuseAddition]) -> Vec<Vec<String>> {
    let mut sorted: Vec<&CaniuseAddition> = additions.iter().collect();
    sorted.sort_by(|a, b| match (a.added, b.added) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
    sorted
        .into_iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.added.map(|d| d.to_string()).unwrap_or_default(),
            ]
        })
        .collect()
}
