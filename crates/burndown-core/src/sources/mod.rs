//! Source adapters.
//!
//! Each adapter wraps one external corpus, already resolved to a fixed
//! reference, and exposes it in a uniform shape: a list of identifiers and,
//! where the corpus cites compat keys, a citing-entity → key-set mapping.
//! Output is a pure function of the loaded corpus; identical input yields
//! identical, identically ordered output.

pub mod bcd;
pub mod caniuse;
pub mod mdn_content;
pub mod traffic;
pub mod web_features;

use crate::model::{CitingEntity, CompatKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub use bcd::{BcdAdapter, BcdCorpus, CompatStatus, KeyFilter, DEFAULT_ROOTS};
pub use caniuse::CaniuseCorpus;
pub use mdn_content::{ContentCitations, ContentInventory, ContentMiningAdapter, ContentRepository};
pub use traffic::TrafficRanking;
pub use web_features::{CatalogLayout, FeatureEntry, WebFeaturesCatalog};

/// A corpus that enumerates identifiers.
pub trait IdentifierSource {
    type Id;

    /// The corpus reference (version tag or commit hash) this source was loaded at
    fn reference(&self) -> &str;

    /// Every identifier, in the source's stable order
    fn list_identifiers(&self) -> Vec<Self::Id>;
}

/// A corpus whose entities cite compat keys.
pub trait CitationSource {
    fn citations(&self) -> BTreeMap<CitingEntity, BTreeSet<CompatKey>>;
}

/// JSON fields that may hold either one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}
