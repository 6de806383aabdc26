//! Plain-text delta report.
//!
//! Layout:
//!
//! ```text
//! Metric                      Before  After  Change  %
//! browser-compat-data keys    1000    1010   +10     +1.00%
//! ...
//!
//! Coverage                    Before  After   Change
//! keys cited by web-features  30.00%  31.68%  +1.68
//!
//! From 2024-01-01 to 2024-01-08 (7 days)
//! ```

use crate::diff::model::{CountChange, Delta, RatioChange};
use crate::diff::percent::{format_net, format_percent_change, format_point_change, format_ratio};

pub fn render_report(delta: &Delta) -> String {
    let mut out = String::new();

    let count_rows: Vec<Vec<String>> = delta.counts.iter().map(count_cells).collect();
    out.push_str(&table(&["Metric", "Before", "After", "Change", "%"], &count_rows));
    out.push('\n');

    let ratio_rows: Vec<Vec<String>> = delta.ratios.iter().map(ratio_cells).collect();
    out.push_str(&table(&["Coverage", "Before", "After", "Change"], &ratio_rows));
    out.push('\n');

    out.push_str(&summary_line(delta));
    out.push('\n');
    out
}

/// `From <date> to <date> (<n> days)`
pub fn summary_line(delta: &Delta) -> String {
    let days = delta.elapsed_days;
    format!(
        "From {} to {} ({} {})",
        delta.before_date.date_naive(),
        delta.after_date.date_naive(),
        days,
        if days == 1 { "day" } else { "days" }
    )
}

pub(crate) fn count_cells(change: &CountChange) -> Vec<String> {
    vec![
        change.metric.label().to_string(),
        change.before.to_string(),
        change.after.to_string(),
        format_net(change.net),
        format_percent_change(change.percent),
    ]
}

pub(crate) fn ratio_cells(change: &RatioChange) -> Vec<String> {
    vec![
        change.metric.label().to_string(),
        format_ratio(change.before),
        format_ratio(change.after),
        format_point_change(change.point_change),
    ]
}

/// Left-aligned columns separated by two spaces.
fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    for row in std::iter::once(&header).chain(rows) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}
