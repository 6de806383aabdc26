//! Content-mining adapter.
//!
//! Citations from documentation pages are obtained by checking out the
//! content repository at a commit and running an external inventory
//! extraction over it. Both steps are expensive, so results are cached by
//! commit hash; a cached entry is trusted unconditionally because the commit
//! fully determines the content.

use crate::cache::KvCache;
use crate::errors::{BurndownError, ExError, ExErrorKind, ExResult};
use crate::model::{CitingEntity, CompatKey};
use crate::sources::traffic::normalize_slug;
use crate::sources::{CitationSource, OneOrMany};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Output document of the inventory extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInventory {
    pub metadata: InventoryMetadata,
    pub inventory: Vec<InventoryItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMetadata {
    pub commit: String,
    pub commit_short: String,
    pub author_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub path: String,
    pub frontmatter: Frontmatter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    pub title: String,
    pub slug: String,
    #[serde(rename = "page-type", default)]
    pub page_type: Option<String>,
    #[serde(rename = "browser-compat", default)]
    pub browser_compat: Option<OneOrMany>,
}

/// Port to the content repository working copy.
pub trait ContentRepository {
    /// Check out `commit` in the working copy.
    ///
    /// # Errors
    ///
    /// `ExternalTool` when version control fails.
    fn checkout(&self, commit: &str) -> ExResult<()>;

    /// Run the inventory extraction over the current checkout.
    ///
    /// # Errors
    ///
    /// `ExternalTool` when the extractor fails, `Serialization` when its
    /// output is not an inventory document.
    fn extract_inventory(&self) -> ExResult<ContentInventory>;
}

/// Slug → cited compat keys, for one content commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentCitations {
    pub commit: String,
    pub by_slug: BTreeMap<String, BTreeSet<CompatKey>>,
}

impl ContentCitations {
    /// Build from an extracted inventory. Pages without compat data are omitted.
    pub fn from_inventory(commit: impl Into<String>, inventory: &ContentInventory) -> Self {
        let mut by_slug: BTreeMap<String, BTreeSet<CompatKey>> = BTreeMap::new();
        for item in &inventory.inventory {
            let Some(compat) = item.frontmatter.browser_compat.clone() else {
                continue;
            };
            let keys = compat.into_vec();
            if keys.is_empty() {
                continue;
            }
            by_slug
                .entry(normalize_slug(&item.frontmatter.slug))
                .or_default()
                .extend(keys.into_iter().map(CompatKey::from));
        }
        Self {
            commit: commit.into(),
            by_slug,
        }
    }

    /// Every key cited by any page
    pub fn all_keys(&self) -> BTreeSet<CompatKey> {
        self.by_slug.values().flatten().cloned().collect()
    }

    /// Keys cited by the given pages only
    pub fn keys_for_slugs(&self, slugs: &BTreeSet<String>) -> BTreeSet<CompatKey> {
        self.by_slug
            .iter()
            .filter(|(slug, _)| slugs.contains(*slug))
            .flat_map(|(_, keys)| keys.iter().cloned())
            .collect()
    }

    fn to_cache_value(&self) -> serde_json::Value {
        serde_json::json!({
            "commit": self.commit,
            "bySlug": self.by_slug,
        })
    }

    fn from_cache_value(key: &str, value: &serde_json::Value) -> ExResult<Self> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Cached {
            commit: String,
            by_slug: BTreeMap<String, BTreeSet<CompatKey>>,
        }
        let cached: Cached = serde_json::from_value(value.clone()).map_err(|e| {
            ExError::from(BurndownError::MalformedCache {
                path: format!("content cache entry {}", key),
                reason: e.to_string(),
            })
        })?;
        Ok(Self {
            commit: cached.commit,
            by_slug: cached.by_slug,
        })
    }
}

impl CitationSource for ContentCitations {
    fn citations(&self) -> BTreeMap<CitingEntity, BTreeSet<CompatKey>> {
        self.by_slug
            .iter()
            .map(|(slug, keys)| (CitingEntity::DocPage { slug: slug.clone() }, keys.clone()))
            .collect()
    }
}

/// Produces citations for a content commit, through the cache.
pub struct ContentMiningAdapter<'a> {
    repo: &'a dyn ContentRepository,
    cache: &'a mut dyn KvCache,
}

impl<'a> ContentMiningAdapter<'a> {
    pub fn new(repo: &'a dyn ContentRepository, cache: &'a mut dyn KvCache) -> Self {
        Self { repo, cache }
    }

    /// Citations at `commit`; checks out and extracts only on a cache miss.
    ///
    /// # Errors
    ///
    /// - `MalformedCache` if the cached entry for `commit` cannot be read
    /// - `ExternalTool` if checkout/extraction fails or the extracted
    ///   inventory belongs to a different commit
    /// - any error from flushing the cache
    pub fn citations(&mut self, commit: &str) -> ExResult<ContentCitations> {
        if let Some(cached) = self.cache.get(commit) {
            tracing::debug!(commit_hash = commit, "content inventory cache hit");
            return ContentCitations::from_cache_value(commit, cached);
        }

        tracing::info!(
            commit_hash = commit,
            "content inventory not cached; checking out and extracting"
        );
        self.repo.checkout(commit)?;
        let inventory = self.repo.extract_inventory()?;

        let extracted = inventory.metadata.commit.as_str();
        if !(extracted.starts_with(commit) || commit.starts_with(extracted)) || extracted.is_empty() {
            return Err(ExError::new(ExErrorKind::ExternalTool)
                .with_op("extract_inventory")
                .with_entity_id(commit)
                .with_message(format!(
                    "inventory was extracted at commit {} instead of the requested one",
                    extracted
                )));
        }

        let citations = ContentCitations::from_inventory(commit, &inventory);
        self.cache.put(commit.to_string(), citations.to_cache_value());
        self.cache.flush()?;
        Ok(citations)
    }
}
