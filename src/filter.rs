//! Case-insensitive substring filtering of the merged candidate view.
//!
//! Re-runs on every keystroke over tens of thousands of rows, so it returns
//! indices into the view rather than cloned records; only the rows visible in
//! the picker window are materialized for rendering.

use crate::catalog::NameRecord;

/// Result of filtering: indices into the candidate view, order preserved.
/// An empty result after a non-empty query is a distinct "no results" state.
#[derive(Debug, Default)]
pub struct FilterResult {
    pub indices: Vec<usize>,
    pub query_was_empty: bool,
}

impl FilterResult {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True when a non-empty query matched nothing ("No results found.").
    pub fn no_results(&self) -> bool {
        self.indices.is_empty() && !self.query_was_empty
    }
}

/// Filter the view by case-insensitive substring match on the display name.
/// An empty query returns the full view unchanged in order.
pub fn filter_view(view: &[NameRecord], query: &str) -> FilterResult {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return FilterResult {
            indices: (0..view.len()).collect(),
            query_was_empty: true,
        };
    }
    let needle = trimmed.to_lowercase();
    FilterResult {
        indices: view
            .iter()
            .enumerate()
            .filter(|(_, r)| r.lower_name.contains(&needle))
            .map(|(i, _)| i)
            .collect(),
        query_was_empty: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{parse_catalog_tsv, SetTag};

    fn view() -> Vec<NameRecord> {
        parse_catalog_tsv(
            "Anna\t400\nANNA\t10\nanna\t5\nJan\t500\nMarie\t300\n",
            SetTag::Simple,
        )
        .unwrap()
    }

    #[test]
    fn empty_query_returns_full_view_in_order() {
        let view = view();
        let result = filter_view(&view, "");
        assert_eq!(result.indices, vec![0, 1, 2, 3, 4]);
        assert!(result.query_was_empty);
        assert!(!result.no_results());
    }

    #[test]
    fn match_is_case_insensitive() {
        let view = view();
        let result = filter_view(&view, "ann");
        let names: Vec<&str> = result
            .indices
            .iter()
            .map(|&i| view[i].display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Anna", "ANNA", "anna"]);
        let upper = filter_view(&view, "ANN");
        assert_eq!(upper.indices, result.indices);
    }

    #[test]
    fn substring_matches_anywhere() {
        let view = view();
        let result = filter_view(&view, "ari");
        assert_eq!(result.len(), 1);
        assert_eq!(view[result.indices[0]].display_name, "Marie");
    }

    #[test]
    fn no_results_is_distinct_from_empty_query() {
        let view = view();
        let result = filter_view(&view, "xyz");
        assert!(result.is_empty());
        assert!(result.no_results());
        let empty = filter_view(&Vec::new(), "");
        assert!(empty.is_empty());
        assert!(!empty.no_results());
    }

    #[test]
    fn whitespace_only_query_counts_as_empty() {
        let view = view();
        let result = filter_view(&view, "   ");
        assert!(result.query_was_empty);
        assert_eq!(result.len(), view.len());
    }
}
