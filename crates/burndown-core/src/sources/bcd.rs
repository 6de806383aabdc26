//! Compatibility-corpus adapter.
//!
//! The corpus is the single-document JSON form of the compatibility data:
//! a `browsers` table plus one tree per category. Any node carrying a
//! `__compat` block names a compat key; its dotted path is the key.

use crate::errors::{BurndownError, Result};
use crate::model::CompatKey;
use crate::sources::IdentifierSource;
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Root categories walked when none are configured.
pub const DEFAULT_ROOTS: &[&str] = &[
    "api",
    "css",
    "html",
    "http",
    "javascript",
    "mathml",
    "svg",
    "webassembly",
    "webdriver",
];

const COMPAT: &str = "__compat";

/// Status metadata of one compat key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompatStatus {
    pub standard_track: bool,
    pub deprecated: bool,
}

/// Optional status filters applied while walking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFilter {
    pub standard_track_only: bool,
    pub exclude_deprecated: bool,
}

impl KeyFilter {
    fn admits(&self, status: CompatStatus) -> bool {
        (!self.standard_track_only || status.standard_track)
            && (!self.exclude_deprecated || !status.deprecated)
    }
}

/// One browser release from the `browsers` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub release_date: Option<NaiveDate>,
    pub engine: Option<String>,
}

/// The loaded compatibility corpus at one commit.
#[derive(Debug, Clone)]
pub struct BcdCorpus {
    commit_hash: String,
    data: Map<String, Value>,
}

impl BcdCorpus {
    /// Parse the corpus document.
    ///
    /// # Errors
    ///
    /// - `InvalidCorpus` if the document root is not a JSON object
    /// - `Serialization` if the text is not JSON
    pub fn from_json_str(json: &str, commit_hash: impl Into<String>) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value, commit_hash)
    }

    /// Wrap an already parsed corpus document.
    ///
    /// # Errors
    ///
    /// `InvalidCorpus` if the document root is not a JSON object.
    pub fn from_value(value: Value, commit_hash: impl Into<String>) -> Result<Self> {
        match value {
            Value::Object(data) => Ok(Self {
                commit_hash: commit_hash.into(),
                data,
            }),
            _ => Err(BurndownError::InvalidCorpus {
                corpus: "browser-compat-data".to_string(),
                reason: "document root must be an object".to_string(),
            }),
        }
    }

    pub fn commit_hash(&self) -> &str {
        &self.commit_hash
    }

    /// Walk the given roots and return every compat key that passes `filter`.
    ///
    /// Order is depth-first: a node before its children, roots and siblings
    /// sorted by name. Each key appears exactly once.
    pub fn keys(&self, roots: &[String], filter: KeyFilter) -> Vec<CompatKey> {
        let mut sorted_roots: Vec<&String> = roots.iter().collect();
        sorted_roots.sort();
        sorted_roots.dedup();

        let mut out = Vec::new();
        for root in sorted_roots {
            if let Some(Value::Object(node)) = self.data.get(root.as_str()) {
                self.walk(&CompatKey::new(root.as_str()), node, filter, &mut out);
            }
        }
        out
    }

    fn walk(
        &self,
        path: &CompatKey,
        node: &Map<String, Value>,
        filter: KeyFilter,
        out: &mut Vec<CompatKey>,
    ) {
        if let Some(compat) = node.get(COMPAT).and_then(Value::as_object) {
            if filter.admits(status_of(compat)) {
                out.push(path.clone());
            }
        }

        let mut children: Vec<(&String, &Map<String, Value>)> = node
            .iter()
            .filter(|(name, _)| !name.starts_with("__"))
            .filter_map(|(name, child)| child.as_object().map(|obj| (name, obj)))
            .collect();
        children.sort_by(|a, b| a.0.cmp(b.0));

        for (name, child) in children {
            self.walk(&path.child(name), child, filter, out);
        }
    }

    /// The `__compat` block of a key, if the key exists.
    pub fn compat(&self, key: &CompatKey) -> Option<&Map<String, Value>> {
        let mut segments = key.segments();
        let mut node = self.data.get(segments.next()?)?.as_object()?;
        for segment in segments {
            node = node.get(segment)?.as_object()?;
        }
        node.get(COMPAT)?.as_object()
    }

    /// Status flags of a key; `None` if the key does not exist.
    pub fn status(&self, key: &CompatKey) -> Option<CompatStatus> {
        self.compat(key).map(status_of)
    }

    /// Look up one browser release.
    pub fn release(&self, browser: &str, version: &str) -> Option<ReleaseInfo> {
        let release = self
            .data
            .get("browsers")?
            .get(browser)?
            .get("releases")?
            .get(version)?;
        Some(ReleaseInfo {
            release_date: release
                .get("release_date")
                .and_then(Value::as_str)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
            engine: release
                .get("engine")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

fn status_of(compat: &Map<String, Value>) -> CompatStatus {
    let status = compat.get("status");
    let flag = |name: &str| {
        status
            .and_then(|s| s.get(name))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    };
    CompatStatus {
        standard_track: flag("standard_track"),
        deprecated: flag("deprecated"),
    }
}

/// Identifier view of the compatibility corpus with a fixed root set.
pub struct BcdAdapter<'a> {
    corpus: &'a BcdCorpus,
    roots: Vec<String>,
    filter: KeyFilter,
}

impl<'a> BcdAdapter<'a> {
    pub fn new(corpus: &'a BcdCorpus, roots: Vec<String>, filter: KeyFilter) -> Self {
        Self {
            corpus,
            roots,
            filter,
        }
    }

    /// Adapter over [`DEFAULT_ROOTS`] with no status filter.
    pub fn with_default_roots(corpus: &'a BcdCorpus) -> Self {
        Self::new(
            corpus,
            DEFAULT_ROOTS.iter().map(|r| r.to_string()).collect(),
            KeyFilter::default(),
        )
    }

    pub fn corpus(&self) -> &BcdCorpus {
        self.corpus
    }
}

impl IdentifierSource for BcdAdapter<'_> {
    type Id = CompatKey;

    fn reference(&self) -> &str {
        self.corpus.commit_hash()
    }

    fn list_identifiers(&self) -> Vec<CompatKey> {
        self.corpus.keys(&self.roots, self.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn corpus() -> BcdCorpus {
        BcdCorpus::from_value(
            json!({
                "browsers": {
                    "chrome": {"releases": {"100": {"release_date": "2022-03-29", "engine": "Blink"}}}
                },
                "css": {
                    "properties": {
                        "gap": {
                            "__compat": {"status": {"standard_track": true, "deprecated": false}},
                            "grid_context": {"__compat": {"status": {"standard_track": true, "deprecated": false}}}
                        },
                        "-moz-binding": {"__compat": {"status": {"standard_track": false, "deprecated": true}}}
                    }
                },
                "api": {
                    "Window": {
                        "__compat": {"status": {"standard_track": true, "deprecated": false}},
                        "fetch": {"__compat": {"status": {"standard_track": true, "deprecated": false}}},
                        "back": {"__compat": {"status": {"standard_track": false, "deprecated": true}}}
                    }
                },
                "webextensions": {"api": {"alarms": {"__compat": {}}}}
            }),
            "abc123",
        )
        .unwrap()
    }

    fn roots() -> Vec<String> {
        DEFAULT_ROOTS.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_walk_is_depth_first_and_alphabetic() {
        let keys: Vec<String> = corpus()
            .keys(&roots(), KeyFilter::default())
            .into_iter()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(
            keys,
            vec![
                "api.Window",
                "api.Window.back",
                "api.Window.fetch",
                "css.properties.-moz-binding",
                "css.properties.gap",
                "css.properties.gap.grid_context",
            ]
        );
    }

    #[test]
    fn test_walk_ignores_roots_outside_the_set() {
        let keys = corpus().keys(&roots(), KeyFilter::default());
        assert!(keys.iter().all(|k| k.root() != "webextensions"));
    }

    #[test]
    fn test_status_filters() {
        let filter = KeyFilter {
            standard_track_only: true,
            exclude_deprecated: true,
        };
        let keys = corpus().keys(&roots(), filter);
        assert_eq!(keys.len(), 4);
        assert!(!keys.contains(&CompatKey::new("api.Window.back")));
    }

    #[test]
    fn test_status_and_release_lookup() {
        let c = corpus();
        let status = c.status(&CompatKey::new("css.properties.-moz-binding")).unwrap();
        assert!(status.deprecated);
        assert!(!status.standard_track);
        assert!(c.status(&CompatKey::new("css.properties.nope")).is_none());

        let release = c.release("chrome", "100").unwrap();
        assert_eq!(release.engine.as_deref(), Some("Blink"));
        assert_eq!(
            release.release_date,
            NaiveDate::from_ymd_opt(2022, 3, 29)
        );
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let err = BcdCorpus::from_value(json!([1, 2]), "x").unwrap_err();
        assert!(matches!(err, BurndownError::InvalidCorpus { .. }));
    }
}
