//! Burndown listings: compat keys and support-matrix ids that the feature
//! catalog does not cover yet.

use crate::commands::pipeline::{run_pipeline, PipelineOptions, PipelinePorts};
use crate::ports::CaniuseHistory;
use burndown_core::cache::KvCache;
use burndown_core::csv::{rows_to_string, Delim};
use burndown_core::errors::{BurndownError, ExError, ExResult};
use burndown_core::inventory_builder::caniuse_ids_without_feature;
use burndown_core::render::{
    caniuse_burndown_rows, compat_burndown_rows, CaniuseAddition, CANIUSE_BURNDOWN_HEADER,
    COMPAT_BURNDOWN_HEADER,
};
use burndown_core_types::RunContext;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

fn header(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

/// Compat keys without a feature, with their citation and baseline facts.
///
/// # Errors
///
/// Any pipeline failure.
pub fn compat_burndown(
    date: DateTime<FixedOffset>,
    ports: &mut PipelinePorts<'_>,
    options: &PipelineOptions,
    delim: Delim,
) -> ExResult<String> {
    let output = run_pipeline(&RunContext::new(), date, ports, options)?;
    let rows = compat_burndown_rows(&output.inventory, &output.baselines);
    Ok(rows_to_string(&header(&COMPAT_BURNDOWN_HEADER), &rows, delim))
}

/// Support-matrix ids without a feature, oldest addition first.
///
/// # Errors
///
/// Any pipeline or history failure; `MalformedCache` for an unreadable
/// cached entry.
pub fn caniuse_burndown(
    date: DateTime<FixedOffset>,
    ports: &mut PipelinePorts<'_>,
    options: &PipelineOptions,
    history: &dyn CaniuseHistory,
    added_cache: &mut dyn KvCache,
    delim: Delim,
) -> ExResult<String> {
    let output = run_pipeline(&RunContext::new(), date, ports, options)?;
    let added = caniuse_added_dates(history, added_cache)?;

    let additions: Vec<CaniuseAddition> = caniuse_ids_without_feature(&output.inventory)
        .into_iter()
        .map(|id| CaniuseAddition {
            added: added.get(id.as_str()).copied(),
            id,
        })
        .collect();
    Ok(rows_to_string(
        &header(&CANIUSE_BURNDOWN_HEADER),
        &caniuse_burndown_rows(&additions),
        delim,
    ))
}

/// First-added dates keyed by id, cached under the repository HEAD hash.
///
/// # Errors
///
/// History failures, `MalformedCache`, or cache flush failures.
pub fn caniuse_added_dates(
    history: &dyn CaniuseHistory,
    cache: &mut dyn KvCache,
) -> ExResult<BTreeMap<String, NaiveDate>> {
    let head = history.head()?;
    if let Some(cached) = cache.get(&head) {
        tracing::debug!(commit_hash = %head, "added dates cache hit");
        return parse_cached_dates(&head, cached);
    }

    tracing::info!(commit_hash = %head, "added dates not cached; reading repository history");
    let dates = history.added_dates()?;
    let value: Map<String, Value> = dates
        .iter()
        .map(|(id, date)| (id.clone(), Value::String(date.to_string())))
        .collect();
    cache.put(head, Value::Object(value));
    cache.flush()?;
    Ok(dates)
}

fn parse_cached_dates(head: &str, cached: &Value) -> ExResult<BTreeMap<String, NaiveDate>> {
    let malformed = |reason: String| -> ExError {
        BurndownError::MalformedCache {
            path: format!("added dates entry {head}"),
            reason,
        }
        .into()
    };

    let entries = cached
        .as_object()
        .ok_or_else(|| malformed("expected an object of id → date".to_string()))?;
    entries
        .iter()
        .map(|(id, date)| {
            let date = date
                .as_str()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .ok_or_else(|| malformed(format!("{id} has no YYYY-MM-DD date")))?;
            Ok((id.clone(), date))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burndown_core::cache::MemoryCache;
    use burndown_core::errors::ExErrorKind;
    use serde_json::json;
    use std::cell::Cell;

    struct CountingHistory {
        reads: Cell<usize>,
    }

    impl CaniuseHistory for CountingHistory {
        fn head(&self) -> ExResult<String> {
            Ok("abc123".to_string())
        }

        fn added_dates(&self) -> ExResult<BTreeMap<String, NaiveDate>> {
            self.reads.set(self.reads.get() + 1);
            Ok([(
                "css-grid".to_string(),
                NaiveDate::from_ymd_opt(2017, 3, 1).unwrap(),
            )]
            .into_iter()
            .collect())
        }
    }

    #[test]
    fn test_history_read_once_per_head() {
        let history = CountingHistory { reads: Cell::new(0) };
        let mut cache = MemoryCache::new();

        let first = caniuse_added_dates(&history, &mut cache).unwrap();
        let second = caniuse_added_dates(&history, &mut cache).unwrap();

        assert_eq!(first, second);
        assert_eq!(history.reads.get(), 1);
        assert_eq!(cache.flush_count(), 1);
        assert_eq!(cache.get("abc123").unwrap()["css-grid"], "2017-03-01");
    }

    #[test]
    fn test_malformed_cached_entry_is_fatal() {
        let history = CountingHistory { reads: Cell::new(0) };
        let mut cache = MemoryCache::new();
        cache.put("abc123".to_string(), json!({"css-grid": 2017}));

        let err = caniuse_added_dates(&history, &mut cache).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::MalformedCache);
        assert_eq!(history.reads.get(), 0);
    }
}
