// Integration tests for the compat and support-matrix burndown listings

mod common;

use burndown_core::cache::{KvCache, MemoryCache};
use burndown_core::csv::Delim;
use burndown_core::errors::ExResult;
use burndown_engine::commands::burndown::{caniuse_burndown, compat_burndown};
use burndown_engine::{CaniuseHistory, PipelineOptions, PipelinePorts};
use chrono::NaiveDate;
use common::{date, FakeContentRepo, FakeResolver};
use std::collections::BTreeMap;

struct FixedHistory;

impl CaniuseHistory for FixedHistory {
    fn head(&self) -> ExResult<String> {
        Ok("feedbeef".to_string())
    }

    fn added_dates(&self) -> ExResult<BTreeMap<String, NaiveDate>> {
        Ok([
            ("css-grid".to_string(), NaiveDate::from_ymd_opt(2016, 5, 2).unwrap()),
            ("fetch".to_string(), NaiveDate::from_ymd_opt(2015, 1, 20).unwrap()),
        ]
        .into_iter()
        .collect())
    }
}

#[test]
fn test_compat_burndown_lists_uncited_keys() {
    let mut resolver = FakeResolver::new(&["fetch", "gap"]);
    let content = FakeContentRepo::new();
    let mut cache = MemoryCache::new();
    let mut ports = PipelinePorts {
        corpora: &mut resolver,
        content: &content,
        content_cache: &mut cache,
        traffic: None,
    };

    let csv = compat_burndown(
        date("2024-01-08T00:00:00Z"),
        &mut ports,
        &PipelineOptions::default(),
        Delim::Csv,
    )
    .unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines[0],
        "key,cited_by_docs,cited_by_top_traffic,baseline_low,baseline_high,engine_count,last_introduced,deprecated,standard_track"
    );
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "css.properties.zoom,true,,,,2,2020-01-01,false,false");
    assert_eq!(lines[2], "html.elements.blink,false,,unresolved,unresolved,0,,true,false");
}

#[test]
fn test_caniuse_burndown_uses_cached_added_dates() {
    let mut resolver = FakeResolver::new(&["fetch", "gap"]);
    let content = FakeContentRepo::new();
    let mut content_cache = MemoryCache::new();
    let mut added_cache = MemoryCache::new();
    let mut ports = PipelinePorts {
        corpora: &mut resolver,
        content: &content,
        content_cache: &mut content_cache,
        traffic: None,
    };

    let tsv = caniuse_burndown(
        date("2024-01-08T00:00:00Z"),
        &mut ports,
        &PipelineOptions::default(),
        &FixedHistory,
        &mut added_cache,
        Delim::Tsv,
    )
    .unwrap();

    // fetch is cited by a feature; css-zoom has no recorded addition
    assert_eq!(tsv, "id\tadded\ncss-grid\t2016-05-02\ncss-zoom\t\n");
    assert!(added_cache.get("feedbeef").is_some());
}
