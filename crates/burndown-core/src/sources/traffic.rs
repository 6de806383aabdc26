//! Traffic ranking of documentation pages.
//!
//! Input is a CSV table with at least a `page` column; row order is rank
//! order (first data row = rank 1). Page values may be full paths such as
//! `/en-US/docs/Web/API/fetch`; they are reduced to slugs (`Web/API/fetch`)
//! and compared case-insensitively. A row with an empty or missing `page`
//! cell still holds its rank; it just names no page.

use crate::csv::parse_rows;
use crate::errors::{BurndownError, Result};
use std::collections::{BTreeSet, HashMap};

/// Default cutoff for "high-traffic" pages.
pub const DEFAULT_TOP_N: usize = 1000;

/// Pages ordered by traffic, most visited first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficRanking {
    /// One entry per ranked row; `None` for a row without a page
    slugs: Vec<Option<String>>,
}

fn ranked_slug(page: &str) -> Option<String> {
    Some(normalize_slug(page)).filter(|s| !s.is_empty())
}

impl TrafficRanking {
    /// Parse the ranking table.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the header row has no `page` column.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut rows = parse_rows(text, ',').into_iter();
        let header = rows.next().unwrap_or_default();
        let page_col = header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("page"))
            .ok_or_else(|| BurndownError::InvalidInput {
                reason: "traffic ranking has no `page` column".to_string(),
            })?;

        let slugs = rows
            .map(|row| row.get(page_col).and_then(|p| ranked_slug(p)))
            .collect();
        Ok(Self { slugs })
    }

    /// Build from slugs already in rank order.
    pub fn from_slugs<I, S>(slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            slugs: slugs.into_iter().map(|s| ranked_slug(s.as_ref())).collect(),
        }
    }

    /// Ranked rows, including rows without a page
    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }

    /// Normalized slugs of the first `n` rows.
    pub fn top(&self, n: usize) -> BTreeSet<String> {
        self.slugs.iter().take(n).flatten().cloned().collect()
    }

    /// 1-based rank of every slug; the first occurrence wins.
    pub fn ranks(&self) -> HashMap<String, usize> {
        let mut ranks = HashMap::with_capacity(self.slugs.len());
        for (i, slug) in self.slugs.iter().enumerate() {
            if let Some(slug) = slug {
                ranks.entry(slug.clone()).or_insert(i + 1);
            }
        }
        ranks
    }
}

/// Reduce a page path or slug to the comparable slug form.
pub fn normalize_slug(page: &str) -> String {
    let trimmed = page.trim().trim_end_matches('/');
    let slug = match trimmed.find("/docs/") {
        Some(idx) => &trimmed[idx + "/docs/".len()..],
        None => trimmed.trim_start_matches('/'),
    };
    slug.to_lowercase()
}
