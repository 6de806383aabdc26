//! Inventory builder.
//!
//! Combines the source adapters, each already resolved to a fixed corpus
//! reference, into one [`Inventory`]. The result depends only on the
//! adapters' output: key order is the compatibility corpus walk order and
//! every derived set is ordered.

use crate::model::{CaniuseId, CitationFact, CitingEntity, CompatKey, Inventory, InventoryEntry};
use crate::sources::{
    CitationSource, ContentCitations, IdentifierSource, TrafficRanking, WebFeaturesCatalog,
};
use std::collections::BTreeSet;

/// Resolved sources for one build.
pub struct InventoryInputs<'a> {
    pub compat: &'a dyn IdentifierSource<Id = CompatKey>,
    pub catalog: &'a WebFeaturesCatalog,
    pub caniuse: &'a dyn IdentifierSource<Id = CaniuseId>,
    pub content: &'a ContentCitations,
    /// Page-view ranking; `None` leaves the top-traffic flag absent
    pub traffic: Option<&'a TrafficRanking>,
    pub top_n: usize,
}

/// Build the inventory for one set of resolved sources.
pub fn build_inventory(inputs: &InventoryInputs<'_>) -> Inventory {
    let doc_keys = inputs.content.all_keys();
    let top_traffic_doc_keys = inputs
        .traffic
        .map(|ranking| inputs.content.keys_for_slugs(&ranking.top(inputs.top_n)));
    let feature_keys = inputs.catalog.compat_keys();

    let entries: Vec<InventoryEntry> = inputs
        .compat
        .list_identifiers()
        .into_iter()
        .map(|key| InventoryEntry {
            cited_by_docs: doc_keys.contains(&key),
            cited_by_top_traffic: top_traffic_doc_keys.as_ref().map(|top| top.contains(&key)),
            cited_by_features: feature_keys.contains(&key),
            key,
        })
        .collect();

    let ranks = inputs.traffic.map(TrafficRanking::ranks);
    let mut facts = Vec::new();
    for (citer, keys) in inputs
        .content
        .citations()
        .into_iter()
        .chain(inputs.catalog.citations())
    {
        let traffic_rank = match (&citer, &ranks) {
            (CitingEntity::DocPage { slug }, Some(ranks)) => ranks.get(slug).copied(),
            _ => None,
        };
        facts.extend(keys.into_iter().map(|key| CitationFact {
            key,
            citer: citer.clone(),
            traffic_rank,
        }));
    }
    facts.sort();

    let mut caniuse_ids = inputs.caniuse.list_identifiers();
    caniuse_ids.sort();
    caniuse_ids.dedup();

    tracing::debug!(
        key_count = entries.len(),
        citation_count = facts.len(),
        top_traffic_configured = top_traffic_doc_keys.is_some(),
        "inventory built"
    );

    Inventory {
        entries,
        facts,
        doc_keys,
        top_traffic_doc_keys,
        top_traffic_cutoff: inputs.traffic.map(|_| inputs.top_n),
        feature_ids: inputs.catalog.list_identifiers(),
        feature_keys,
        feature_caniuse_ids: inputs.catalog.caniuse_ids(),
        caniuse_ids,
    }
}

/// Keys of `inventory` that no feature cites, in walk order.
pub fn uncited_by_features(inventory: &Inventory) -> Vec<&InventoryEntry> {
    inventory
        .entries
        .iter()
        .filter(|e| !e.cited_by_features)
        .collect()
}

/// Support-matrix ids that no feature cites.
pub fn caniuse_ids_without_feature(inventory: &Inventory) -> Vec<CaniuseId> {
    let cited: &BTreeSet<CaniuseId> = &inventory.feature_caniuse_ids;
    inventory
        .caniuse_ids
        .iter()
        .filter(|id| !cited.contains(*id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{BcdAdapter, BcdCorpus, CaniuseCorpus, CatalogLayout};
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn bcd() -> BcdCorpus {
        BcdCorpus::from_value(
            json!({
                "api": {
                    "fetch": {"__compat": {}},
                    "Window": {"__compat": {}, "back": {"__compat": {}}}
                },
                "css": {"properties": {"gap": {"__compat": {}}}}
            }),
            "bcd-hash",
        )
        .unwrap()
    }

    fn catalog() -> WebFeaturesCatalog {
        WebFeaturesCatalog::from_value(
            json!({"features": {
                "fetch": {"compat_features": ["api.fetch"], "caniuse": "fetch"},
                "gap": {"compat_features": ["css.properties.gap"]}
            }}),
            "1.0.0",
            CatalogLayout::Sectioned,
        )
        .unwrap()
    }

    fn content() -> ContentCitations {
        let mut by_slug = BTreeMap::new();
        by_slug.insert(
            "web/api/fetch".to_string(),
            [CompatKey::new("api.fetch")].into_iter().collect(),
        );
        by_slug.insert(
            "web/api/window/back".to_string(),
            [CompatKey::new("api.Window.back"), CompatKey::new("api.removed")]
                .into_iter()
                .collect(),
        );
        ContentCitations {
            commit: "content-hash".to_string(),
            by_slug,
        }
    }

    fn build(traffic: Option<&TrafficRanking>, top_n: usize) -> Inventory {
        let corpus = bcd();
        let adapter = BcdAdapter::with_default_roots(&corpus);
        let catalog = catalog();
        let caniuse = CaniuseCorpus::new("1.0.30001", [CaniuseId::new("fetch"), CaniuseId::new("css-grid")]);
        let content = content();
        build_inventory(&InventoryInputs {
            compat: &adapter,
            catalog: &catalog,
            caniuse: &caniuse,
            content: &content,
            traffic,
            top_n,
        })
    }

    #[test]
    fn test_build_is_deterministic() {
        let ranking = TrafficRanking::from_slugs(["web/api/fetch"]);
        let a = build(Some(&ranking), 10);
        let b = build(Some(&ranking), 10);
        assert_eq!(a, b);
        let keys: Vec<&str> = a.keys().map(CompatKey::as_str).collect();
        assert_eq!(keys, vec!["api.Window", "api.Window.back", "api.fetch", "css.properties.gap"]);
    }

    #[test]
    fn test_flags_per_key() {
        let ranking = TrafficRanking::from_slugs(["web/api/fetch"]);
        let inv = build(Some(&ranking), 1);

        let fetch = inv.entry(&CompatKey::new("api.fetch")).unwrap();
        assert!(fetch.cited_by_docs);
        assert_eq!(fetch.cited_by_top_traffic, Some(true));
        assert!(fetch.cited_by_features);

        let back = inv.entry(&CompatKey::new("api.Window.back")).unwrap();
        assert!(back.cited_by_docs);
        assert_eq!(back.cited_by_top_traffic, Some(false));
        assert!(!back.cited_by_features);

        assert_eq!(inv.top_traffic_cutoff, Some(1));
    }

    #[test]
    fn test_missing_ranking_leaves_flag_absent() {
        let inv = build(None, 1000);
        assert!(!inv.top_traffic_configured());
        assert!(inv.entries.iter().all(|e| e.cited_by_top_traffic.is_none()));
        assert!(inv.facts.iter().all(|f| f.traffic_rank.is_none()));
    }

    #[test]
    fn test_citations_to_removed_keys_are_kept() {
        let inv = build(None, 1000);
        assert!(inv.doc_keys.contains(&CompatKey::new("api.removed")));
        assert!(inv
            .facts
            .iter()
            .any(|f| f.key.as_str() == "api.removed"));
        assert!(inv.entry(&CompatKey::new("api.removed")).is_none());
    }

    #[test]
    fn test_facts_carry_traffic_rank() {
        let ranking = TrafficRanking::from_slugs(["web/api/window/back", "web/api/fetch"]);
        let inv = build(Some(&ranking), 1000);
        let fact = inv
            .facts
            .iter()
            .find(|f| f.key.as_str() == "api.fetch" && matches!(f.citer, CitingEntity::DocPage { .. }))
            .unwrap();
        assert_eq!(fact.traffic_rank, Some(2));
    }

    #[test]
    fn test_burndown_helpers() {
        let inv = build(None, 1000);
        let uncited: Vec<&str> = uncited_by_features(&inv)
            .into_iter()
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(uncited, vec!["api.Window", "api.Window.back"]);
        assert_eq!(caniuse_ids_without_feature(&inv), vec![CaniuseId::new("css-grid")]);
    }

    proptest! {
        #[test]
        fn prop_top_traffic_is_subset_of_docs(
            order in Just(vec!["web/api/fetch", "web/api/window/back", "glossary"]).prop_shuffle(),
            n in 0usize..5,
        ) {
            let ranking = TrafficRanking::from_slugs(order);
            let inv = build(Some(&ranking), n);
            let top = inv.top_traffic_doc_keys.clone().unwrap();
            prop_assert!(top.is_subset(&inv.doc_keys));
            for e in &inv.entries {
                if e.cited_by_top_traffic == Some(true) {
                    prop_assert!(e.cited_by_docs);
                }
            }
        }
    }
}
