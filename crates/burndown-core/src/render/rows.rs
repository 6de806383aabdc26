//! Flat row export of a delta, one metric per row.

use crate::csv::{rows_to_string, Delim};
use crate::diff::model::Delta;
use crate::render::report::{count_cells, ratio_cells};

pub const ROW_HEADER: [&str; 6] = ["section", "metric", "before", "after", "change", "percent"];

/// Rows `[section, metric, before, after, change, percent]`.
///
/// Coverage rows carry percentages in before/after, percentage points in
/// change, and an empty percent cell.
pub fn render_rows(delta: &Delta) -> Vec<Vec<String>> {
    let counts = delta.counts.iter().map(|c| {
        let mut row = vec![c.metric.section().label().to_string()];
        row.extend(count_cells(c));
        row
    });
    let ratios = delta.ratios.iter().map(|r| {
        let mut row = vec![r.metric.section().label().to_string()];
        row.extend(ratio_cells(r));
        row.push(String::new());
        row
    });
    counts.chain(ratios).collect()
}

/// Header plus rows as CSV or TSV text.
pub fn render_rows_text(delta: &Delta, delim: Delim) -> String {
    let header: Vec<String> = ROW_HEADER.iter().map(|h| h.to_string()).collect();
    rows_to_string(&header, &render_rows(delta), delim)
}
