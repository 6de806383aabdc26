//! Inventory: compat keys at a corpus reference and who cites them.

use crate::model::identifiers::{CaniuseId, CompatKey, FeatureId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An entity that cites compat keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CitingEntity {
    /// A documentation page, identified by its slug
    DocPage { slug: String },
    /// A curated feature from the feature catalog
    Feature { id: FeatureId },
}

/// One citation: `citer` references `key`.
///
/// `traffic_rank` is only ever set for documentation pages that appear in
/// the configured traffic ranking (rank 1 = most visited).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CitationFact {
    pub key: CompatKey,
    pub citer: CitingEntity,
    pub traffic_rank: Option<usize>,
}

/// Per-key citation flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub key: CompatKey,
    pub cited_by_docs: bool,
    /// `None` when no traffic ranking was configured for this run
    pub cited_by_top_traffic: Option<bool>,
    pub cited_by_features: bool,
}

/// Everything known about the corpora at one set of references.
///
/// Built once per run by the inventory builder and never mutated afterwards.
/// Citation sets keep keys verbatim, including keys the compatibility corpus
/// no longer contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    /// Compat keys in corpus walk order, with their citation flags
    pub entries: Vec<InventoryEntry>,
    /// Every citation, sorted
    pub facts: Vec<CitationFact>,
    /// Keys cited by at least one documentation page
    pub doc_keys: BTreeSet<CompatKey>,
    /// Keys cited by a top-N documentation page; `None` if not configured
    pub top_traffic_doc_keys: Option<BTreeSet<CompatKey>>,
    /// The N used for `top_traffic_doc_keys`
    pub top_traffic_cutoff: Option<usize>,
    /// Feature ids in the catalog
    pub feature_ids: Vec<FeatureId>,
    /// Keys cited by at least one feature
    pub feature_keys: BTreeSet<CompatKey>,
    /// Support-matrix ids cited by at least one feature
    pub feature_caniuse_ids: BTreeSet<CaniuseId>,
    /// Support-matrix ids in the support-matrix corpus
    pub caniuse_ids: Vec<CaniuseId>,
}

impl Inventory {
    /// Compat keys in walk order
    pub fn keys(&self) -> impl Iterator<Item = &CompatKey> {
        self.entries.iter().map(|e| &e.key)
    }

    /// Whether the top-traffic flag is computable for this inventory
    pub fn top_traffic_configured(&self) -> bool {
        self.top_traffic_doc_keys.is_some()
    }

    /// Number of entries matching `pred`
    pub fn count_entries(&self, pred: impl Fn(&InventoryEntry) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(e)).count()
    }

    /// Look up a single entry
    pub fn entry(&self, key: &CompatKey) -> Option<&InventoryEntry> {
        self.entries.iter().find(|e| &e.key == key)
    }
}
