//! Baseline resolver.
//!
//! Wraps a [`SupportEvaluator`] and turns its per-key output into a
//! [`BaselineResult`]. Evaluation failures whose message matches one of
//! [`UNRESOLVED_MARKERS`] are data, not errors: the key resolves to the
//! unresolved sentinel and processing continues. Any other failure aborts.

use crate::errors::{BurndownError, ExResult};
use crate::model::{BaselineDate, BaselineResult, CompatKey};
use crate::sources::BcdCorpus;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Failure messages that mean "support data is insufficient".
pub const UNRESOLVED_MARKERS: &[&str] = &[
    "cannot expand support",
    "contains no support data",
    "no release data",
];

/// The release that introduced support in one browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRelease {
    pub browser: String,
    pub version: String,
    pub engine: Option<String>,
    pub release_date: Option<NaiveDate>,
}

/// Successful evaluation of one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportEvaluation {
    /// `None`: never attains cross-engine availability
    pub low: Option<NaiveDate>,
    /// `None`: never attains the "safe" status
    pub high: Option<NaiveDate>,
    /// Releases furnishing the earliest support, one per supporting browser
    pub initial_releases: Vec<EngineRelease>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationFailure {
    pub message: String,
}

impl EvaluationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Whether this failure means the key is unresolvable rather than broken
    pub fn is_unresolved(&self) -> bool {
        UNRESOLVED_MARKERS.iter().any(|m| self.message.contains(m))
    }
}

impl std::fmt::Display for EvaluationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Port to a support-matrix evaluation.
pub trait SupportEvaluator {
    fn evaluate(&self, key: &CompatKey) -> Result<SupportEvaluation, EvaluationFailure>;
}

pub struct BaselineResolver<'a> {
    evaluator: &'a dyn SupportEvaluator,
    corpus: &'a BcdCorpus,
}

impl<'a> BaselineResolver<'a> {
    /// `corpus` supplies the status flags of each key.
    pub fn new(evaluator: &'a dyn SupportEvaluator, corpus: &'a BcdCorpus) -> Self {
        Self { evaluator, corpus }
    }

    /// Resolve one key.
    ///
    /// # Errors
    ///
    /// `SupportEvaluation` when the evaluator fails for a reason other
    /// than insufficient support data.
    pub fn resolve(&self, key: &CompatKey) -> ExResult<BaselineResult> {
        let status = self.corpus.status(key).unwrap_or_default();

        let evaluation = match self.evaluator.evaluate(key) {
            Ok(evaluation) => evaluation,
            Err(failure) if failure.is_unresolved() => {
                tracing::debug!(compat_key = %key, reason = %failure, "baseline unresolved");
                return Ok(BaselineResult::unresolved(
                    key.clone(),
                    status.deprecated,
                    status.standard_track,
                ));
            }
            Err(failure) => {
                return Err(BurndownError::SupportEvaluationFailed {
                    key: key.to_string(),
                    message: failure.message,
                }
                .into())
            }
        };

        let engines: BTreeSet<&str> = evaluation
            .initial_releases
            .iter()
            .filter_map(|r| r.engine.as_deref())
            .collect();
        let last_introduced = evaluation
            .initial_releases
            .iter()
            .filter_map(|r| r.release_date)
            .max();

        Ok(BaselineResult {
            key: key.clone(),
            low: BaselineDate::from_option(evaluation.low),
            high: BaselineDate::from_option(evaluation.high),
            engine_count: engines.len(),
            last_introduced,
            deprecated: status.deprecated,
            standard_track: status.standard_track,
        })
    }

    /// Resolve every key in order; the first fatal failure aborts.
    ///
    /// # Errors
    ///
    /// See [`BaselineResolver::resolve`].
    pub fn resolve_all<'k, I>(&self, keys: I) -> ExResult<Vec<BaselineResult>>
    where
        I: IntoIterator<Item = &'k CompatKey>,
    {
        let mut results = Vec::new();
        for key in keys {
            results.push(self.resolve(key)?);
        }
        Ok(results)
    }
}
