//! Historic batch: one report per target date, strictly in sequence.
//!
//! Resolving a date's corpora can change shared state (checked-out trees,
//! installed packages), so each date's run completes before the next date
//! is resolved.

use crate::commands::generate::generate_report_at;
use crate::commands::pipeline::{PipelineOptions, PipelinePorts};
use crate::ports::PackageInstaller;
use burndown_core::errors::{BurndownError, ExResult};
use burndown_core_types::RunContext;
use burndown_store::{SnapshotStore, WriteOutcome};
use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Utc};
use std::collections::BTreeMap;

/// Inclusive date range sampled every `every_days` days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub every_days: u32,
}

impl HistoricRange {
    /// Parse `FROM..TO` (both `YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// `InvalidInput` on a malformed range, `FROM` after `TO`, or a zero
    /// step.
    pub fn parse(range: &str, every_days: u32) -> ExResult<Self> {
        let invalid = |reason: String| BurndownError::InvalidInput { reason };

        let (from, to) = range
            .split_once("..")
            .ok_or_else(|| invalid(format!("historic range '{range}' must look like FROM..TO")))?;
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| invalid(format!("'{s}' is not a YYYY-MM-DD date")))
        };
        let (from, to) = (parse(from)?, parse(to)?);

        if from > to {
            return Err(invalid(format!("range start {from} is after its end {to}")).into());
        }
        if every_days == 0 {
            return Err(invalid("the step between dates must be at least one day".to_string()).into());
        }
        Ok(Self { from, to, every_days })
    }

    /// Every sampled date, oldest first; always includes `from`.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut current = Some(self.from);
        while let Some(date) = current.filter(|d| *d <= self.to) {
            dates.push(date);
            current = date.checked_add_days(Days::new(u64::from(self.every_days)));
        }
        dates
    }
}

/// Packages installed as of each historic date, in install order.
pub const HISTORIC_PACKAGES: &[&str] = &["@mdn/browser-compat-data", "web-features"];

/// The stable release of a package that was current at `date`: the latest
/// one published at or before it. Registry bookkeeping entries (`created`,
/// `modified`) and prereleases are skipped.
pub fn version_at<'a>(
    published: &'a BTreeMap<String, DateTime<Utc>>,
    date: &DateTime<FixedOffset>,
) -> Option<&'a str> {
    published
        .iter()
        .filter(|(version, at)| {
            version.starts_with(|c: char| c.is_ascii_digit())
                && !version.contains('-')
                && **at <= date.with_timezone(&Utc)
        })
        .max_by(|(va, a), (vb, b)| a.cmp(b).then_with(|| va.cmp(vb)))
        .map(|(version, _)| version.as_str())
}

fn install_as_of(
    installer: &mut dyn PackageInstaller,
    releases: &[(&str, BTreeMap<String, DateTime<Utc>>)],
    date: &DateTime<FixedOffset>,
) -> ExResult<()> {
    for (package, published) in releases {
        let version = version_at(published, date).ok_or_else(|| BurndownError::InvalidInput {
            reason: format!("no release of {package} was published on or before {date}"),
        })?;
        tracing::info!(package = %package, version = %version, date = %date, "installing package");
        installer.install(package, version)?;
    }
    Ok(())
}

/// Generate one report per date of `range`, at midnight UTC.
///
/// Before each date's corpora are resolved, the compatibility corpus and
/// feature catalog releases current at that date are installed.
///
/// # Errors
///
/// The first failing date aborts the batch; reports for earlier dates stay
/// persisted. A date that predates every release of a package fails with
/// `InvalidInput`.
pub fn generate_historic(
    store: &SnapshotStore,
    range: &HistoricRange,
    installer: &mut dyn PackageInstaller,
    ports: &mut PipelinePorts<'_>,
    options: &PipelineOptions,
) -> ExResult<Vec<WriteOutcome>> {
    let releases = HISTORIC_PACKAGES
        .iter()
        .map(|package| Ok((*package, installer.published(package)?)))
        .collect::<ExResult<Vec<_>>>()?;

    let mut written = Vec::new();
    for day in range.dates() {
        let date = day.and_time(NaiveTime::default()).and_utc().fixed_offset();
        let ctx = RunContext::new().with_label(day.to_string());
        tracing::info!(run_id = %ctx.run_id, report_day = %day, "historic report");

        install_as_of(installer, &releases, &date)?;
        let outcome = generate_report_at(store, date, &ctx, ports, options)?;
        written.push(outcome.written);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_and_sample() {
        let range = HistoricRange::parse("2024-01-01..2024-01-20", 7).unwrap();
        assert_eq!(
            range.dates(),
            vec![day("2024-01-01"), day("2024-01-08"), day("2024-01-15")]
        );
    }

    #[test]
    fn test_single_day_range() {
        let range = HistoricRange::parse("2024-01-01..2024-01-01", 30).unwrap();
        assert_eq!(range.dates(), vec![day("2024-01-01")]);
    }

    #[test]
    fn test_version_at_picks_latest_stable_release() {
        let at = |s: &str| DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc);
        let published: BTreeMap<String, DateTime<Utc>> = [
            ("created", "2019-01-01T00:00:00Z"),
            ("modified", "2024-06-01T00:00:00Z"),
            ("5.5.0", "2024-01-02T10:00:00Z"),
            ("5.5.1", "2024-01-09T10:00:00Z"),
            ("5.6.0-beta.1", "2024-01-10T10:00:00Z"),
            ("5.6.0", "2024-01-16T10:00:00Z"),
        ]
        .into_iter()
        .map(|(v, t)| (v.to_string(), at(t)))
        .collect();
        let date = |s: &str| DateTime::parse_from_rfc3339(s).unwrap();

        assert_eq!(version_at(&published, &date("2024-01-08T00:00:00Z")), Some("5.5.0"));
        assert_eq!(version_at(&published, &date("2024-01-15T00:00:00Z")), Some("5.5.1"));
        assert_eq!(version_at(&published, &date("2024-01-16T10:00:00Z")), Some("5.6.0"));
        assert_eq!(version_at(&published, &date("2024-01-01T00:00:00Z")), None);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(HistoricRange::parse("2024-01-01", 7).is_err());
        assert!(HistoricRange::parse("2024-02-01..2024-01-01", 7).is_err());
        assert!(HistoricRange::parse("2024-01-01..2024-02-01", 0).is_err());
        assert!(HistoricRange::parse("yesterday..today", 1).is_err());
    }
}
