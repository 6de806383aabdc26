//! Support-matrix adapter.
//!
//! The support-matrix repository stores one `features-json/<id>.json` file
//! per entry; the file stem is the identifier.

use crate::model::CaniuseId;
use crate::sources::IdentifierSource;

/// The loaded support-matrix corpus at one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaniuseCorpus {
    version: String,
    ids: Vec<CaniuseId>,
}

impl CaniuseCorpus {
    /// Build from identifiers; the list is sorted and deduplicated.
    pub fn new(version: impl Into<String>, ids: impl IntoIterator<Item = CaniuseId>) -> Self {
        let mut ids: Vec<CaniuseId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        Self {
            version: version.into(),
            ids,
        }
    }

    /// Build from `features-json` file names; anything not ending in
    /// `.json` is ignored.
    pub fn from_file_names<I, S>(version: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = names
            .into_iter()
            .filter_map(|n| n.as_ref().strip_suffix(".json").map(CaniuseId::from));
        Self::new(version, ids)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn ids(&self) -> &[CaniuseId] {
        &self.ids
    }
}

impl IdentifierSource for CaniuseCorpus {
    type Id = CaniuseId;

    fn reference(&self) -> &str {
        &self.version
    }

    fn list_identifiers(&self) -> Vec<CaniuseId> {
        self.ids.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_names_sorts_and_filters() {
        let corpus = CaniuseCorpus::from_file_names(
            "1.0.30001600",
            ["fetch.json", "css-grid.json", "README.md", "fetch.json"],
        );
        let ids: Vec<&str> = corpus.ids().iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["css-grid", "fetch"]);
        assert_eq!(corpus.reference(), "1.0.30001600");
    }
}
