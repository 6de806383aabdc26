//! Snapshot ("report") schema.
//!
//! One snapshot is persisted per date as a single JSON document:
//!
//! - `meta`: `date` (RFC 3339 zoned date-time) plus the four corpus references
//! - `browserCompatData.keys`: compat keys in walk order, or their count
//! - `mdnContent.browserCompatKeys`: keys cited by documentation pages
//! - `mdnContent.topTrafficBrowserCompatKeys`: keys cited by top-N pages,
//!   absent when no traffic ranking was configured
//! - `caniuse.ids`: support-matrix ids
//! - `webFeatures.{ids, mdnBrowserCompatDataKeys, caniuseIds}`
//! - `*.cited*Count`: how many of the inventory's own keys (or support-matrix
//!   ids) the citation lists above cover. The lists are kept verbatim and may
//!   name keys outside the inventory, so coverage ratios use these counts.
//! - `baseline`: aggregate baseline counts, absent in snapshots written
//!   without baseline resolution
//!
//! Every list is deduplicated. A snapshot is never modified after it is
//! written.

use crate::model::{
    BaselineResult, BaselineSummary, CaniuseId, CompatKey, CorpusRefs, FeatureId, Inventory,
};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub meta: SnapshotMeta,
    pub browser_compat_data: BcdSection,
    pub mdn_content: ContentSection,
    pub caniuse: CaniuseSection,
    pub web_features: WebFeaturesSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BaselineSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub date: DateTime<FixedOffset>,
    #[serde(flatten)]
    pub refs: CorpusRefs,
}

/// Compat keys stored either in full or as a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyListing {
    Keys(Vec<CompatKey>),
    Count(usize),
}

impl KeyListing {
    pub fn len(&self) -> usize {
        match self {
            KeyListing::Keys(keys) => keys.len(),
            KeyListing::Count(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The listed keys; `None` when only a count was stored.
    pub fn keys(&self) -> Option<&[CompatKey]> {
        match self {
            KeyListing::Keys(keys) => Some(keys),
            KeyListing::Count(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BcdSection {
    pub keys: KeyListing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSection {
    pub browser_compat_keys: Vec<CompatKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_traffic_browser_compat_keys: Option<Vec<CompatKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_traffic_cutoff: Option<usize>,
    /// Inventory keys cited by at least one page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cited_key_count: Option<usize>,
    /// Inventory keys cited by a top-N page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_traffic_cited_key_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaniuseSection {
    pub ids: Vec<CaniuseId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebFeaturesSection {
    pub ids: Vec<FeatureId>,
    pub mdn_browser_compat_data_keys: Vec<CompatKey>,
    pub caniuse_ids: Vec<CaniuseId>,
    /// Inventory keys cited by at least one feature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cited_key_count: Option<usize>,
    /// Support-matrix ids in `caniuse.ids` cited by at least one feature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cited_caniuse_id_count: Option<usize>,
}

/// Scalar counts a snapshot contributes to a delta.
///
/// `*_cited_*` are the sizes of the citation lists as stored. The
/// `covered_*` counts are the numerators of the coverage ratios: only
/// citations of the snapshot's own keys or ids count. They are `None` when
/// the snapshot predates the persisted counts and stores its keys as a bare
/// count, which leaves nothing to intersect with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotCounts {
    pub compat_keys: usize,
    pub feature_ids: usize,
    pub caniuse_ids: usize,
    pub doc_cited_keys: usize,
    /// `None` when the snapshot has no top-traffic listing
    pub top_traffic_cited_keys: Option<usize>,
    pub feature_cited_keys: usize,
    pub feature_caniuse_ids: usize,
    pub doc_covered_keys: Option<usize>,
    pub top_traffic_covered_keys: Option<usize>,
    pub feature_covered_keys: Option<usize>,
    pub feature_covered_caniuse_ids: usize,
    pub baseline: Option<BaselineSummary>,
}

impl Snapshot {
    /// Assemble a snapshot from one run's inventory and baseline results.
    ///
    /// With `list_keys == false` only the compat key count is stored.
    pub fn from_parts(
        date: DateTime<FixedOffset>,
        refs: CorpusRefs,
        inventory: &Inventory,
        baselines: Option<&[BaselineResult]>,
        list_keys: bool,
    ) -> Self {
        let keys = if list_keys {
            KeyListing::Keys(inventory.keys().cloned().collect())
        } else {
            KeyListing::Count(inventory.entries.len())
        };

        Snapshot {
            meta: SnapshotMeta { date, refs },
            browser_compat_data: BcdSection { keys },
            mdn_content: ContentSection {
                browser_compat_keys: inventory.doc_keys.iter().cloned().collect(),
                top_traffic_browser_compat_keys: inventory
                    .top_traffic_doc_keys
                    .as_ref()
                    .map(|keys| keys.iter().cloned().collect()),
                top_traffic_cutoff: inventory.top_traffic_cutoff,
                cited_key_count: Some(inventory.count_entries(|e| e.cited_by_docs)),
                top_traffic_cited_key_count: inventory.top_traffic_configured().then(|| {
                    inventory.count_entries(|e| e.cited_by_top_traffic == Some(true))
                }),
            },
            caniuse: CaniuseSection {
                ids: inventory.caniuse_ids.clone(),
            },
            web_features: WebFeaturesSection {
                ids: inventory.feature_ids.clone(),
                mdn_browser_compat_data_keys: inventory.feature_keys.iter().cloned().collect(),
                caniuse_ids: inventory.feature_caniuse_ids.iter().cloned().collect(),
                cited_key_count: Some(inventory.count_entries(|e| e.cited_by_features)),
                cited_caniuse_id_count: Some(
                    inventory
                        .caniuse_ids
                        .iter()
                        .filter(|id| inventory.feature_caniuse_ids.contains(*id))
                        .count(),
                ),
            },
            baseline: baselines.map(BaselineSummary::from_results),
        }
    }

    /// File name derived from `meta.date`.
    pub fn file_name(&self) -> String {
        snapshot_file_name(&self.meta.date)
    }

    pub fn counts(&self) -> SnapshotCounts {
        let listed: Option<HashSet<&CompatKey>> =
            self.browser_compat_data.keys.keys().map(|keys| keys.iter().collect());
        let covered = |stored: Option<usize>, cited: Option<&[CompatKey]>| {
            stored.or_else(|| {
                let listed = listed.as_ref()?;
                Some(cited?.iter().filter(|k| listed.contains(k)).count())
            })
        };
        let matrix: HashSet<&CaniuseId> = self.caniuse.ids.iter().collect();

        SnapshotCounts {
            compat_keys: self.browser_compat_data.keys.len(),
            feature_ids: self.web_features.ids.len(),
            caniuse_ids: self.caniuse.ids.len(),
            doc_cited_keys: self.mdn_content.browser_compat_keys.len(),
            top_traffic_cited_keys: self
                .mdn_content
                .top_traffic_browser_compat_keys
                .as_ref()
                .map(Vec::len),
            feature_cited_keys: self.web_features.mdn_browser_compat_data_keys.len(),
            feature_caniuse_ids: self.web_features.caniuse_ids.len(),
            doc_covered_keys: covered(
                self.mdn_content.cited_key_count,
                Some(self.mdn_content.browser_compat_keys.as_slice()),
            ),
            top_traffic_covered_keys: covered(
                self.mdn_content.top_traffic_cited_key_count,
                self.mdn_content.top_traffic_browser_compat_keys.as_deref(),
            ),
            feature_covered_keys: covered(
                self.web_features.cited_key_count,
                Some(self.web_features.mdn_browser_compat_data_keys.as_slice()),
            ),
            feature_covered_caniuse_ids: self
                .web_features
                .cited_caniuse_id_count
                .unwrap_or_else(|| {
                    let ids = &self.web_features.caniuse_ids;
                    ids.iter().filter(|id| matrix.contains(id)).count()
                }),
            baseline: self.baseline.clone(),
        }
    }
}

/// Sortable file stem of an instant: the UTC RFC 3339 form with
/// millisecond precision, punctuation stripped.
///
/// `2024-01-08T00:00:00.000Z` → `20240108T000000000Z`. Stems of equal
/// length sort chronologically.
pub fn file_stem(instant: &DateTime<Utc>) -> String {
    instant
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

pub fn snapshot_file_name(date: &DateTime<FixedOffset>) -> String {
    format!("{}.json", file_stem(&date.with_timezone(&Utc)))
}
