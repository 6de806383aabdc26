//! Ports to the world outside the pipeline.
//!
//! Process-backed implementations live in the CLI crate; tests provide
//! hand-written doubles.

use burndown_core::errors::ExResult;
use burndown_core::model::CorpusRefs;
use burndown_core::sources::{BcdCorpus, CaniuseCorpus, WebFeaturesCatalog};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Source of "now" for snapshot timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().fixed_offset()
    }
}

/// A clock pinned to one instant (`REPORT_DATE`, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// The three loaded corpora plus the content commit for one report date.
pub struct ResolvedCorpora {
    pub bcd: BcdCorpus,
    pub catalog: WebFeaturesCatalog,
    pub caniuse: CaniuseCorpus,
    pub mdn_content_commit: String,
}

impl ResolvedCorpora {
    pub fn refs(&self) -> CorpusRefs {
        CorpusRefs {
            browser_compat_data_commit_hash: self.bcd.commit_hash().to_string(),
            web_features_version: self.catalog.version().to_string(),
            caniuse_version: self.caniuse.version().to_string(),
            mdn_content_commit_hash: self.mdn_content_commit.clone(),
        }
    }
}

/// Resolves and loads every corpus as of a report date.
///
/// Resolution may have side effects (checkouts, installs), so callers must
/// not resolve a second date before finishing with the first.
pub trait CorpusResolver {
    /// # Errors
    ///
    /// `ExternalTool`, `InvalidCorpus` or `Io` when a corpus cannot be
    /// obtained; the run aborts.
    fn resolve(&mut self, date: &DateTime<FixedOffset>) -> ExResult<ResolvedCorpora>;
}

/// Package registry plus the local install the corpus files are read from.
///
/// The compatibility corpus and the feature catalog ship as published
/// packages; a historic run installs the release current at each date
/// before resolving that date's corpora.
pub trait PackageInstaller {
    /// Every published version of `package` with its publish time.
    ///
    /// # Errors
    ///
    /// `ExternalTool` when the registry cannot be queried.
    fn published(&self, package: &str) -> ExResult<BTreeMap<String, DateTime<Utc>>>;

    /// Replace the installed copy of `package` with exactly `version`.
    ///
    /// # Errors
    ///
    /// `ExternalTool` when the install fails.
    fn install(&mut self, package: &str, version: &str) -> ExResult<()>;
}

/// Posts rendered statistics somewhere public.
pub trait Publisher {
    /// # Errors
    ///
    /// `ExternalTool` when posting fails.
    fn post_comment(&self, url: &str, body: &str) -> ExResult<()>;
}

/// Interactive yes/no prompt.
pub trait Confirm {
    /// # Errors
    ///
    /// `Io` when the prompt cannot be read.
    fn confirm(&self, prompt: &str) -> ExResult<bool>;
}

/// History of the support-matrix repository.
pub trait CaniuseHistory {
    /// Commit hash of the checked-out HEAD
    ///
    /// # Errors
    ///
    /// `ExternalTool` if the repository cannot be read.
    fn head(&self) -> ExResult<String>;

    /// First-added date of each id, from the repository log
    ///
    /// # Errors
    ///
    /// `ExternalTool` if the log cannot be read.
    fn added_dates(&self) -> ExResult<BTreeMap<String, NaiveDate>>;
}
