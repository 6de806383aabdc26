//! `publish-statistics`: render a delta as Markdown and optionally post it.
//!
//! Posting happens only after explicit confirmation (or `--yes`); declining
//! is an error with no side effect.

use crate::commands::compare::compare_snapshots;
use crate::ports::{Confirm, Publisher};
use burndown_core::errors::{BurndownError, ExResult};
use burndown_core::render::render_markdown;
use burndown_store::{SnapshotStore, SnapshotTarget};
use chrono::{Days, Duration, NaiveDate};

const DEFAULT_WINDOW_DAYS: u64 = 7;

/// The two dates compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishWindow {
    pub from: SnapshotTarget,
    pub to: SnapshotTarget,
}

impl PublishWindow {
    /// `to` defaults to `today`; `from` to seven days before `to`.
    pub fn resolve(from: Option<SnapshotTarget>, to: Option<SnapshotTarget>, today: NaiveDate) -> Self {
        let to = to.unwrap_or(SnapshotTarget::Day(today));
        let from = from.unwrap_or(match to {
            SnapshotTarget::Day(day) => SnapshotTarget::Day(
                day.checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS))
                    .unwrap_or(day),
            ),
            SnapshotTarget::Instant(instant) => {
                SnapshotTarget::Instant(instant - Duration::days(DEFAULT_WINDOW_DAYS as i64))
            }
        });
        Self { from, to }
    }
}

/// Markdown statistics for `window`.
///
/// # Errors
///
/// See [`compare_snapshots`].
pub fn render_statistics(store: &SnapshotStore, window: &PublishWindow, verbose: bool) -> ExResult<String> {
    let delta = compare_snapshots(store, &window.from, &window.to)?;
    Ok(render_markdown(&delta, verbose))
}

/// Post `markdown` as a comment on `url`.
///
/// # Errors
///
/// - `UserDeclined` when confirmation is refused; nothing is posted
/// - `ExternalTool` when posting fails
pub fn post_statistics(
    markdown: &str,
    url: &str,
    assume_yes: bool,
    confirm: &dyn Confirm,
    publisher: &dyn Publisher,
) -> ExResult<()> {
    if !assume_yes && !confirm.confirm(&format!("Post these statistics to {url}?"))? {
        tracing::info!(url, "publishing declined");
        return Err(BurndownError::UserDeclined.into());
    }
    publisher.post_comment(url, markdown)?;
    tracing::info!(url, "statistics posted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_window_defaults() {
        let window = PublishWindow::resolve(None, None, day("2024-01-15"));
        assert_eq!(window.to, SnapshotTarget::Day(day("2024-01-15")));
        assert_eq!(window.from, SnapshotTarget::Day(day("2024-01-08")));
    }

    #[test]
    fn test_window_from_relative_to_explicit_to() {
        let to = SnapshotTarget::Day(day("2024-03-01"));
        let window = PublishWindow::resolve(None, Some(to), day("2024-06-01"));
        assert_eq!(window.from, SnapshotTarget::Day(day("2024-02-23")));

        let instant: DateTime<Utc> = "2024-03-01T12:00:00Z".parse().unwrap();
        let window = PublishWindow::resolve(None, Some(SnapshotTarget::Instant(instant)), day("2024-06-01"));
        let expected: DateTime<Utc> = "2024-02-23T12:00:00Z".parse().unwrap();
        assert_eq!(window.from, SnapshotTarget::Instant(expected));
    }

    #[test]
    fn test_explicit_window_kept() {
        let from = SnapshotTarget::Day(day("2023-01-01"));
        let window = PublishWindow::resolve(Some(from), None, day("2024-01-15"));
        assert_eq!(window.from, from);
    }
}
