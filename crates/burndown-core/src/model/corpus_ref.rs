//! Corpus references: the immutable coordinates a snapshot was computed from.

use serde::{Deserialize, Serialize};

/// The four references that fully determine an inventory.
///
/// The compatibility corpus and the content corpus are content-addressed
/// (commit hashes); the feature catalog and the support matrix are
/// identified by their published version tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusRefs {
    pub browser_compat_data_commit_hash: String,
    pub web_features_version: String,
    pub caniuse_version: String,
    pub mdn_content_commit_hash: String,
}
