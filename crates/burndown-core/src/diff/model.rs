//! Delta output types.
//!
//! A delta is derived on demand from two snapshots and never persisted.
//! Metric lists are in a fixed order so renderers need no sorting.

use crate::model::CorpusRefs;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Comparison of two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delta {
    pub identity: DeltaIdentity,
    pub classification: DeltaClassification,
    pub before_date: DateTime<FixedOffset>,
    pub after_date: DateTime<FixedOffset>,
    /// Whole days from `before_date` to `after_date`
    pub elapsed_days: i64,
    pub before_refs: CorpusRefs,
    pub after_refs: CorpusRefs,
    pub counts: Vec<CountChange>,
    pub ratios: Vec<RatioChange>,
}

impl Delta {
    pub fn count(&self, metric: Metric) -> Option<&CountChange> {
        self.counts.iter().find(|c| c.metric == metric)
    }

    pub fn ratio(&self, metric: Metric) -> Option<&RatioChange> {
        self.ratios.iter().find(|r| r.metric == metric)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaIdentity {
    pub before_digest: String,
    pub before_semantic_digest: String,
    pub after_digest: String,
    pub after_semantic_digest: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeltaClassification {
    /// Byte-identical documents
    Identical,
    /// Only `meta.date` differs
    NoChange,
    Changed,
}

/// Grouping used by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    Sources,
    Citations,
    Baseline,
    Coverage,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Section::Sources => "sources",
            Section::Citations => "citations",
            Section::Baseline => "baseline",
            Section::Coverage => "coverage",
        }
    }
}

/// Every tracked metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    CompatKeys,
    FeatureIds,
    CaniuseIds,
    DocCitedKeys,
    TopTrafficCitedKeys,
    FeatureCitedKeys,
    FeatureCaniuseIds,
    BaselineLow,
    BaselineHigh,
    BaselineNever,
    BaselineUnresolved,
    DocKeyCoverage,
    TopTrafficKeyCoverage,
    FeatureKeyCoverage,
    FeatureCaniuseCoverage,
}

impl Metric {
    pub fn section(self) -> Section {
        match self {
            Metric::CompatKeys | Metric::FeatureIds | Metric::CaniuseIds => Section::Sources,
            Metric::DocCitedKeys
            | Metric::TopTrafficCitedKeys
            | Metric::FeatureCitedKeys
            | Metric::FeatureCaniuseIds => Section::Citations,
            Metric::BaselineLow
            | Metric::BaselineHigh
            | Metric::BaselineNever
            | Metric::BaselineUnresolved => Section::Baseline,
            Metric::DocKeyCoverage
            | Metric::TopTrafficKeyCoverage
            | Metric::FeatureKeyCoverage
            | Metric::FeatureCaniuseCoverage => Section::Coverage,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::CompatKeys => "browser-compat-data keys",
            Metric::FeatureIds => "web-features features",
            Metric::CaniuseIds => "caniuse features",
            Metric::DocCitedKeys => "keys cited by mdn/content",
            Metric::TopTrafficCitedKeys => "keys cited by top-traffic pages",
            Metric::FeatureCitedKeys => "keys cited by web-features",
            Metric::FeatureCaniuseIds => "caniuse ids cited by web-features",
            Metric::BaselineLow => "keys with a Baseline low date",
            Metric::BaselineHigh => "keys with a Baseline high date",
            Metric::BaselineNever => "keys not yet Baseline",
            Metric::BaselineUnresolved => "keys with unresolved Baseline",
            Metric::DocKeyCoverage => "keys cited by mdn/content",
            Metric::TopTrafficKeyCoverage => "keys cited by top-traffic pages",
            Metric::FeatureKeyCoverage => "keys cited by web-features",
            Metric::FeatureCaniuseCoverage => "caniuse ids cited by web-features",
        }
    }
}

/// Relative change of a count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PercentChange {
    /// Percent units: `5.0` is +5 %
    Defined(f64),
    /// Before was zero and after is not
    New,
}

/// A coverage ratio in percent units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Ratio {
    Defined(f64),
    /// The denominator is zero, or the numerator cannot be derived
    Undefined,
}

impl Ratio {
    pub fn of(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            Ratio::Undefined
        } else {
            Ratio::Defined(numerator as f64 / denominator as f64 * 100.0)
        }
    }

    /// `Undefined` when `covered` is unknown
    pub fn of_covered(covered: Option<usize>, denominator: usize) -> Self {
        covered.map_or(Ratio::Undefined, |n| Ratio::of(n, denominator))
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(v),
            Ratio::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountChange {
    pub metric: Metric,
    pub before: usize,
    pub after: usize,
    pub net: i64,
    pub percent: PercentChange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioChange {
    pub metric: Metric,
    pub before: Ratio,
    pub after: Ratio,
    /// Percentage points; `None` when either side is undefined
    pub point_change: Option<f64>,
}
