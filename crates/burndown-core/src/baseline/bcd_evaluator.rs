//! Support evaluator over the compatibility corpus itself.
//!
//! A key is "low" once every core browser has shipped support; the low date
//! is the latest of those first-support release dates. It becomes "high"
//! thirty months later, provided that date is not after the evaluation date.

use crate::baseline::resolver::{EngineRelease, EvaluationFailure, SupportEvaluation, SupportEvaluator};
use crate::model::CompatKey;
use crate::sources::BcdCorpus;
use chrono::{Months, NaiveDate};
use serde_json::Value;

/// Browsers whose support defines cross-engine availability.
pub const CORE_BROWSERS: &[&str] = &[
    "chrome",
    "chrome_android",
    "edge",
    "firefox",
    "firefox_android",
    "safari",
    "safari_ios",
];

const HIGH_AFTER_MONTHS: u32 = 30;

pub struct BcdSupportEvaluator<'a> {
    corpus: &'a BcdCorpus,
    evaluation_date: NaiveDate,
}

impl<'a> BcdSupportEvaluator<'a> {
    pub fn new(corpus: &'a BcdCorpus, evaluation_date: NaiveDate) -> Self {
        Self {
            corpus,
            evaluation_date,
        }
    }

    /// First shipping release for `browser`, or `None` when unsupported.
    fn initial_release(
        &self,
        key: &CompatKey,
        browser: &str,
        support: &Value,
    ) -> Result<Option<EngineRelease>, EvaluationFailure> {
        let statements: Vec<&Value> = match support {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        let Some(statement) = statements.into_iter().find(|s| is_plain_support(s)) else {
            return Ok(None);
        };

        let version = match statement.get("version_added") {
            Some(Value::String(v)) => v.as_str(),
            Some(Value::Bool(false)) | Some(Value::Null) | None => return Ok(None),
            Some(other) => {
                return Err(EvaluationFailure::new(format!(
                    "{key}: cannot expand support for {browser} from version_added {other}"
                )))
            }
        };
        if version == "preview" || version.starts_with('≤') || version.contains('-') {
            return Err(EvaluationFailure::new(format!(
                "{key}: cannot expand support for {browser} {version}"
            )));
        }

        let release = self.corpus.release(browser, version).ok_or_else(|| {
            EvaluationFailure::new(format!("{key}: no release data for {browser} {version}"))
        })?;
        Ok(Some(EngineRelease {
            browser: browser.to_string(),
            version: version.to_string(),
            engine: release.engine,
            release_date: release.release_date,
        }))
    }
}

/// Unflagged, unprefixed, complete, not later removed.
fn is_plain_support(statement: &Value) -> bool {
    let absent = |field: &str| statement.get(field).map_or(true, Value::is_null);
    absent("flags")
        && absent("prefix")
        && absent("alternative_name")
        && absent("version_removed")
        && !statement
            .get("partial_implementation")
            .and_then(Value::as_bool)
            .unwrap_or(false)
}

impl SupportEvaluator for BcdSupportEvaluator<'_> {
    fn evaluate(&self, key: &CompatKey) -> Result<SupportEvaluation, EvaluationFailure> {
        let support = self
            .corpus
            .compat(key)
            .and_then(|compat| compat.get("support"))
            .and_then(Value::as_object)
            .ok_or_else(|| EvaluationFailure::new(format!("{key} contains no support data")))?;

        let mut initial_releases = Vec::new();
        let mut all_dated = true;
        for browser in CORE_BROWSERS {
            let Some(statement) = support.get(*browser) else {
                return Err(EvaluationFailure::new(format!(
                    "{key} contains no support data for {browser}"
                )));
            };
            match self.initial_release(key, browser, statement)? {
                Some(release) => {
                    all_dated &= release.release_date.is_some();
                    initial_releases.push(release);
                }
                None => all_dated = false,
            }
        }

        let low = if all_dated {
            initial_releases.iter().filter_map(|r| r.release_date).max()
        } else {
            None
        };
        let high = low
            .and_then(|d| d.checked_add_months(Months::new(HIGH_AFTER_MONTHS)))
            .filter(|d| *d <= self.evaluation_date);

        Ok(SupportEvaluation {
            low,
            high,
            initial_releases,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn browsers() -> Value {
        let mut table = serde_json::Map::new();
        for (browser, engine, day) in [
            ("chrome", "Blink", "2020-01-01"),
            ("chrome_android", "Blink", "2020-01-01"),
            ("edge", "Blink", "2020-02-01"),
            ("firefox", "Gecko", "2020-03-01"),
            ("firefox_android", "Gecko", "2020-03-01"),
            ("safari", "WebKit", "2021-06-01"),
            ("safari_ios", "WebKit", "2021-06-01"),
        ] {
            table.insert(
                browser.to_string(),
                json!({"releases": {
                    "10": {"release_date": day, "engine": engine},
                    "11": {"engine": engine}
                }}),
            );
        }
        Value::Object(table)
    }

    fn support_everywhere(version: &str) -> Value {
        let mut support = serde_json::Map::new();
        for browser in CORE_BROWSERS {
            support.insert(browser.to_string(), json!({"version_added": version}));
        }
        Value::Object(support)
    }

    fn corpus_with(key_support: Value) -> BcdCorpus {
        BcdCorpus::from_value(
            json!({
                "browsers": browsers(),
                "api": {"thing": {"__compat": {"support": key_support}}, "bare": {"__compat": {}}}
            }),
            "h",
        )
        .unwrap()
    }

    #[test]
    fn test_low_and_high_dates() {
        let corpus = corpus_with(support_everywhere("10"));
        let evaluator = BcdSupportEvaluator::new(&corpus, date("2024-06-01"));
        let eval = evaluator.evaluate(&CompatKey::new("api.thing")).unwrap();
        assert_eq!(eval.low, Some(date("2021-06-01")));
        assert_eq!(eval.high, Some(date("2023-12-01")));
        assert_eq!(eval.initial_releases.len(), CORE_BROWSERS.len());
    }

    #[test]
    fn test_high_is_null_before_thirty_months() {
        let corpus = corpus_with(support_everywhere("10"));
        let evaluator = BcdSupportEvaluator::new(&corpus, date("2022-01-01"));
        let eval = evaluator.evaluate(&CompatKey::new("api.thing")).unwrap();
        assert!(eval.low.is_some());
        assert_eq!(eval.high, None);
    }

    #[test]
    fn test_missing_browser_support_is_never() {
        let mut support = support_everywhere("10");
        support["safari"] = json!({"version_added": false});
        support["safari_ios"] = json!([{"version_added": "10", "flags": [{"type": "preference"}]}]);
        let corpus = corpus_with(support);
        let evaluator = BcdSupportEvaluator::new(&corpus, date("2024-06-01"));
        let eval = evaluator.evaluate(&CompatKey::new("api.thing")).unwrap();
        assert_eq!(eval.low, None);
        assert_eq!(eval.high, None);
        assert_eq!(eval.initial_releases.len(), 5);
    }

    #[test]
    fn test_undated_release_is_not_low() {
        let corpus = corpus_with(support_everywhere("11"));
        let evaluator = BcdSupportEvaluator::new(&corpus, date("2024-06-01"));
        let eval = evaluator.evaluate(&CompatKey::new("api.thing")).unwrap();
        assert_eq!(eval.low, None);
        assert!(eval.initial_releases.iter().all(|r| r.release_date.is_none()));
    }

    #[test]
    fn test_unresolved_failures() {
        let corpus = corpus_with(support_everywhere("≤10"));
        let evaluator = BcdSupportEvaluator::new(&corpus, date("2024-06-01"));
        let err = evaluator.evaluate(&CompatKey::new("api.thing")).unwrap_err();
        assert!(err.message.contains("cannot expand support"));
        assert!(err.is_unresolved());

        let err = evaluator.evaluate(&CompatKey::new("api.bare")).unwrap_err();
        assert!(err.message.contains("contains no support data"));

        let corpus = corpus_with(support_everywhere("99"));
        let evaluator = BcdSupportEvaluator::new(&corpus, date("2024-06-01"));
        let err = evaluator.evaluate(&CompatKey::new("api.thing")).unwrap_err();
        assert!(err.is_unresolved());
    }
}
