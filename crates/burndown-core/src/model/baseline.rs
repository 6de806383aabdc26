//! Baseline results for single compat keys and their corpus-wide aggregate.

use crate::model::identifiers::CompatKey;
use chrono::NaiveDate;
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

const UNRESOLVED: &str = "unresolved";

/// One of the two adoption dates of a compat key.
///
/// Serialized as an ISO date string, `null` for [`BaselineDate::Never`],
/// or the literal string `"unresolved"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaselineDate {
    /// The status was attained on this date
    Date(NaiveDate),
    /// The key never attains this status with the current data
    Never,
    /// Support data is insufficient to compute the status
    Unresolved,
}

impl BaselineDate {
    pub fn from_option(date: Option<NaiveDate>) -> Self {
        match date {
            Some(d) => BaselineDate::Date(d),
            None => BaselineDate::Never,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            BaselineDate::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, BaselineDate::Unresolved)
    }
}

impl std::fmt::Display for BaselineDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaselineDate::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            BaselineDate::Never => f.write_str(""),
            BaselineDate::Unresolved => f.write_str(UNRESOLVED),
        }
    }
}

impl Serialize for BaselineDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BaselineDate::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            BaselineDate::Never => serializer.serialize_none(),
            BaselineDate::Unresolved => serializer.serialize_str(UNRESOLVED),
        }
    }
}

impl<'de> Deserialize<'de> for BaselineDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BaselineDateVisitor;

        impl<'de> Visitor<'de> for BaselineDateVisitor {
            type Value = BaselineDate;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an ISO date, null, or \"unresolved\"")
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(BaselineDate::Never)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(BaselineDate::Never)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
                d.deserialize_any(self)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v == UNRESOLVED {
                    return Ok(BaselineDate::Unresolved);
                }
                NaiveDate::parse_from_str(v, "%Y-%m-%d")
                    .map(BaselineDate::Date)
                    .map_err(|e| E::custom(format!("invalid baseline date `{}`: {}", v, e)))
            }
        }

        deserializer.deserialize_option(BaselineDateVisitor)
    }
}

/// Baseline status of one compat key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineResult {
    pub key: CompatKey,
    /// First cross-engine availability
    pub low: BaselineDate,
    /// "Safe to adopt" date
    pub high: BaselineDate,
    /// Distinct rendering engines with support
    pub engine_count: usize,
    /// Latest release date among the releases that introduced support;
    /// `None` when no such release carries a date
    pub last_introduced: Option<NaiveDate>,
    pub deprecated: bool,
    pub standard_track: bool,
}

impl BaselineResult {
    /// Sentinel result for keys whose support data cannot be evaluated.
    pub fn unresolved(key: CompatKey, deprecated: bool, standard_track: bool) -> Self {
        Self {
            key,
            low: BaselineDate::Unresolved,
            high: BaselineDate::Unresolved,
            engine_count: 0,
            last_introduced: None,
            deprecated,
            standard_track,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        self.low.is_unresolved()
    }
}

/// Corpus-wide counts derived from per-key baseline results.
///
/// Unresolved keys are counted only in `unresolved`; they are neither
/// "low", "high" nor "never".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineSummary {
    pub low: usize,
    pub high: usize,
    pub never: usize,
    pub unresolved: usize,
    pub deprecated: usize,
    pub standard_track: usize,
    pub unresolved_keys: Vec<CompatKey>,
}

impl BaselineSummary {
    pub fn from_results(results: &[BaselineResult]) -> Self {
        let mut summary = BaselineSummary::default();
        for r in results {
            match r.low {
                BaselineDate::Date(_) => summary.low += 1,
                BaselineDate::Never => summary.never += 1,
                BaselineDate::Unresolved => {
                    summary.unresolved += 1;
                    summary.unresolved_keys.push(r.key.clone());
                }
            }
            if matches!(r.high, BaselineDate::Date(_)) {
                summary.high += 1;
            }
            if r.deprecated {
                summary.deprecated += 1;
            }
            if r.standard_track {
                summary.standard_track += 1;
            }
        }
        summary.unresolved_keys.sort();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_baseline_date_wire_forms() {
        let cases = [
            (BaselineDate::Date(date("2023-03-14")), "\"2023-03-14\""),
            (BaselineDate::Never, "null"),
            (BaselineDate::Unresolved, "\"unresolved\""),
        ];
        for (value, wire) in cases {
            assert_eq!(serde_json::to_string(&value).unwrap(), wire);
            let back: BaselineDate = serde_json::from_str(wire).unwrap();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn test_baseline_date_rejects_garbage() {
        assert!(serde_json::from_str::<BaselineDate>("\"soon\"").is_err());
    }

    #[test]
    fn test_summary_counts_unresolved_separately() {
        let results = vec![
            BaselineResult {
                key: CompatKey::new("css.properties.gap"),
                low: BaselineDate::Date(date("2021-04-26")),
                high: BaselineDate::Date(date("2023-10-26")),
                engine_count: 3,
                last_introduced: Some(date("2021-04-26")),
                deprecated: false,
                standard_track: true,
            },
            BaselineResult {
                key: CompatKey::new("api.Foo"),
                low: BaselineDate::Never,
                high: BaselineDate::Never,
                engine_count: 1,
                last_introduced: None,
                deprecated: true,
                standard_track: false,
            },
            BaselineResult::unresolved(CompatKey::new("api.Bar"), false, true),
        ];
        let summary = BaselineSummary::from_results(&results);
        assert_eq!(summary.low, 1);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.never, 1);
        assert_eq!(summary.unresolved, 1);
        assert_eq!(summary.deprecated, 1);
        assert_eq!(summary.standard_track, 2);
        assert_eq!(summary.unresolved_keys, vec![CompatKey::new("api.Bar")]);
    }
}
