//! Markdown rendering of a delta, as posted to the tracking issue.

use crate::diff::model::Delta;
use crate::model::CorpusRefs;
use crate::render::report::{count_cells, ratio_cells, summary_line};

/// Render a delta as Markdown. `verbose` adds corpus references and digests.
pub fn render_markdown(delta: &Delta, verbose: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "## Burndown statistics, {} to {}\n\n",
        delta.before_date.date_naive(),
        delta.after_date.date_naive()
    ));

    out.push_str("| Metric | Before | After | Change | % |\n|---|---:|---:|---:|---:|\n");
    for change in &delta.counts {
        out.push_str(&md_row(&count_cells(change)));
    }
    out.push('\n');

    out.push_str("| Coverage | Before | After | Change (points) |\n|---|---:|---:|---:|\n");
    for change in &delta.ratios {
        out.push_str(&md_row(&ratio_cells(change)));
    }
    out.push('\n');

    out.push_str(&format!("_{}_\n", summary_line(delta)));

    if verbose {
        out.push_str("\n<details>\n<summary>Sources</summary>\n\n");
        out.push_str("| Source | Before | After |\n|---|---|---|\n");
        for (name, before, after) in ref_pairs(&delta.before_refs, &delta.after_refs) {
            out.push_str(&md_row(&[name.to_string(), code(before), code(after)]));
        }
        out.push_str(&format!(
            "\nSemantic digests: `{}` → `{}` ({:?})\n",
            short(&delta.identity.before_semantic_digest),
            short(&delta.identity.after_semantic_digest),
            delta.classification,
        ));
        out.push_str("\n</details>\n");
    }
    out
}

fn md_row(cells: &[String]) -> String {
    let escaped: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
    format!("| {} |\n", escaped.join(" | "))
}

fn code(value: &str) -> String {
    format!("`{}`", value)
}

fn short(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

fn ref_pairs<'a>(before: &'a CorpusRefs, after: &'a CorpusRefs) -> [(&'static str, &'a str, &'a str); 4] {
    [
        (
            "browser-compat-data",
            &before.browser_compat_data_commit_hash,
            &after.browser_compat_data_commit_hash,
        ),
        (
            "web-features",
            &before.web_features_version,
            &after.web_features_version,
        ),
        ("caniuse", &before.caniuse_version, &after.caniuse_version),
        (
            "mdn/content",
            &before.mdn_content_commit_hash,
            &after.mdn_content_commit_hash,
        ),
    ]
}
