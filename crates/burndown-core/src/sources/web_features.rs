//! Feature-catalog adapter.
//!
//! Two catalog document layouts exist across releases. The layout is picked
//! from configuration; the adapter never guesses it from the document.

use crate::errors::{BurndownError, Result};
use crate::model::{CaniuseId, CitingEntity, CompatKey, FeatureId};
use crate::sources::{CitationSource, IdentifierSource, OneOrMany};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Document layout of the feature catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogLayout {
    /// Root object maps feature id → feature (early releases)
    Flat,
    /// Root object has a `features` table next to `groups`/`snapshots`;
    /// entries with a `kind` other than `feature` are redirects and skipped
    #[default]
    Sectioned,
}

impl CatalogLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Sectioned => "sectioned",
        }
    }
}

impl std::str::FromStr for CatalogLayout {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim() {
            "flat" => Ok(Self::Flat),
            "sectioned" => Ok(Self::Sectioned),
            other => Err(format!(
                "invalid catalog layout '{other}', expected one of: flat, sectioned"
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    compat_features: Option<Vec<String>>,
    #[serde(default)]
    caniuse: Option<OneOrMany>,
}

/// One curated feature and what it cites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEntry {
    pub id: FeatureId,
    pub compat_features: Vec<CompatKey>,
    pub caniuse: Vec<CaniuseId>,
}

/// The loaded feature catalog at one version.
#[derive(Debug, Clone)]
pub struct WebFeaturesCatalog {
    version: String,
    features: Vec<FeatureEntry>,
}

impl WebFeaturesCatalog {
    /// Parse the catalog document using the configured layout.
    ///
    /// # Errors
    ///
    /// - `Serialization` if the text is not JSON or a feature is malformed
    /// - `InvalidCorpus` if the document does not have the expected layout
    pub fn from_json_str(
        json: &str,
        version: impl Into<String>,
        layout: CatalogLayout,
    ) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value, version, layout)
    }

    /// Build from a parsed document.
    ///
    /// # Errors
    ///
    /// See [`WebFeaturesCatalog::from_json_str`].
    pub fn from_value(value: Value, version: impl Into<String>, layout: CatalogLayout) -> Result<Self> {
        let table = feature_table(value, layout)?;

        let mut features = Vec::with_capacity(table.len());
        for (id, raw) in table {
            let raw: RawFeature = serde_json::from_value(raw)?;
            if raw.kind.as_deref().is_some_and(|k| k != "feature") {
                continue;
            }
            let mut compat_features: Vec<CompatKey> = raw
                .compat_features
                .unwrap_or_default()
                .into_iter()
                .map(CompatKey::from)
                .collect();
            compat_features.sort();
            compat_features.dedup();
            let mut caniuse: Vec<CaniuseId> = raw
                .caniuse
                .map(OneOrMany::into_vec)
                .unwrap_or_default()
                .into_iter()
                .map(CaniuseId::from)
                .collect();
            caniuse.sort();
            caniuse.dedup();
            features.push(FeatureEntry {
                id: FeatureId::from(id),
                compat_features,
                caniuse,
            });
        }
        features.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(Self {
            version: version.into(),
            features,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Compat keys cited by any feature, deduplicated
    pub fn compat_keys(&self) -> BTreeSet<CompatKey> {
        self.features
            .iter()
            .flat_map(|f| f.compat_features.iter().cloned())
            .collect()
    }

    /// Support-matrix ids cited by any feature, deduplicated
    pub fn caniuse_ids(&self) -> BTreeSet<CaniuseId> {
        self.features
            .iter()
            .flat_map(|f| f.caniuse.iter().cloned())
            .collect()
    }
}

fn feature_table(value: Value, layout: CatalogLayout) -> Result<Map<String, Value>> {
    let invalid = |reason: &str| BurndownError::InvalidCorpus {
        corpus: format!("web-features ({} layout)", layout.as_str()),
        reason: reason.to_string(),
    };
    let Value::Object(mut root) = value else {
        return Err(invalid("document root must be an object"));
    };
    match layout {
        CatalogLayout::Flat => Ok(root),
        CatalogLayout::Sectioned => match root.remove("features") {
            Some(Value::Object(features)) => Ok(features),
            _ => Err(invalid("missing `features` table")),
        },
    }
}

impl IdentifierSource for WebFeaturesCatalog {
    type Id = FeatureId;

    fn reference(&self) -> &str {
        &self.version
    }

    fn list_identifiers(&self) -> Vec<FeatureId> {
        self.features.iter().map(|f| f.id.clone()).collect()
    }
}

impl CitationSource for WebFeaturesCatalog {
    fn citations(&self) -> BTreeMap<CitingEntity, BTreeSet<CompatKey>> {
        self.features
            .iter()
            .map(|f| {
                (
                    CitingEntity::Feature { id: f.id.clone() },
                    f.compat_features.iter().cloned().collect(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sectioned_layout() {
        let doc = json!({
            "groups": {},
            "snapshots": {},
            "features": {
                "grid": {
                    "kind": "feature",
                    "compat_features": ["css.properties.grid", "css.properties.gap", "css.properties.grid"],
                    "caniuse": "css-grid"
                },
                "fetch": {"compat_features": ["api.fetch"], "caniuse": ["fetch", "abortcontroller"]},
                "old-name": {"kind": "moved", "redirect_target": "grid"},
                "nothing": {}
            }
        });
        let catalog = WebFeaturesCatalog::from_value(doc, "2.1.0", CatalogLayout::Sectioned).unwrap();

        let ids: Vec<String> = catalog.list_identifiers().iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["fetch", "grid", "nothing"]);
        assert_eq!(catalog.reference(), "2.1.0");

        let grid = &catalog.features[1];
        assert_eq!(
            grid.compat_features,
            vec![CompatKey::new("css.properties.gap"), CompatKey::new("css.properties.grid")]
        );
        assert_eq!(grid.caniuse, vec![CaniuseId::new("css-grid")]);
        assert_eq!(catalog.caniuse_ids().len(), 3);
        assert_eq!(catalog.compat_keys().len(), 3);
    }

    #[test]
    fn test_flat_layout() {
        let doc = json!({"grid": {"compat_features": ["css.properties.grid"]}});
        let catalog = WebFeaturesCatalog::from_value(doc, "0.4.0", CatalogLayout::Flat).unwrap();
        assert_eq!(catalog.features.len(), 1);
        let citations = catalog.citations();
        let cited = citations
            .get(&CitingEntity::Feature { id: FeatureId::new("grid") })
            .unwrap();
        assert!(cited.contains(&CompatKey::new("css.properties.grid")));
    }

    #[test]
    fn test_layout_mismatch_is_an_error() {
        let doc = json!({"grid": {"compat_features": []}});
        let err = WebFeaturesCatalog::from_value(doc, "0.4.0", CatalogLayout::Sectioned).unwrap_err();
        assert!(matches!(err, BurndownError::InvalidCorpus { .. }));
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("flat".parse::<CatalogLayout>().unwrap(), CatalogLayout::Flat);
        assert!("auto".parse::<CatalogLayout>().is_err());
    }
}
