//! Opaque identifiers from the three corpora.
//!
//! All identifiers are plain strings on the wire (`#[serde(transparent)]`)
//! and order lexicographically, which is what every sorted listing in a
//! snapshot relies on.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Dotted path naming one capability in the compatibility corpus,
    /// e.g. `api.Window.fetch` or `css.properties.gap`.
    CompatKey
);

string_id!(
    /// Identifier of a curated feature in the feature catalog.
    FeatureId
);

string_id!(
    /// Identifier of an entry in the third-party support matrix.
    CaniuseId
);

impl CompatKey {
    /// Top-level category (`api`, `css`, ...)
    pub fn root(&self) -> &str {
        self.0.split('.').next().unwrap_or_default()
    }

    /// Path segments in order
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Build a child key by appending one segment
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}.{}", self.0, segment))
    }
}
