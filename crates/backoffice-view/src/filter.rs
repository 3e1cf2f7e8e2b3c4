//! Search box plus facet dropdowns, combined.

use serde::{Deserialize, Serialize};

use crate::accessor::FieldSource;
use crate::facet::{FacetFilter, FacetValue, Facets};
use crate::path::FieldPath;
use crate::search::SearchPredicate;

/// Filter state of a list screen.
///
/// A record passes when it matches the search query (any search path) AND
/// every facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Free-text query. Empty means no search constraint.
    pub query: String,
    /// Facet selections keyed by field path.
    pub facets: Facets,
}

impl FilterConfig {
    /// Creates an empty filter that matches everything.
    pub fn new() -> Self {
        FilterConfig::default()
    }

    /// Sets the search query.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Sets one facet.
    pub fn facet(mut self, path: FieldPath, value: impl Into<FacetValue>) -> Self {
        self.facets.insert(path, value.into());
        self
    }

    /// Returns `true` if neither the query nor any facet narrows the set.
    pub fn is_unconstrained(&self) -> bool {
        self.query.is_empty() && FacetFilter::new(&self.facets).is_unconstrained()
    }

    /// Tests one record, searching `search_paths` for the query.
    pub fn matches<R: FieldSource + ?Sized>(&self, record: &R, search_paths: &[FieldPath]) -> bool {
        FacetFilter::new(&self.facets).matches(record)
            && SearchPredicate::new(&self.query, search_paths).matches(record)
    }
}

/// Returns the indices of `records` that pass `filter`, in input order.
pub fn filter_indices<R: FieldSource>(
    records: &[R],
    filter: &FilterConfig,
    search_paths: &[FieldPath],
) -> Vec<usize> {
    let facets = FacetFilter::new(&filter.facets);
    let search = SearchPredicate::new(&filter.query, search_paths);
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| facets.matches(*record) && search.matches(*record))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value as Json};

    fn path(p: &str) -> FieldPath {
        FieldPath::parse(p).unwrap()
    }

    fn users() -> Vec<Json> {
        vec![
            json!({"name": "Ann Smith", "status": "active"}),
            json!({"name": "Bob Jones", "status": "inactive"}),
            json!({"name": "Cy Smithers", "status": "inactive"}),
        ]
    }

    #[test]
    fn unconstrained_filter_keeps_everything() {
        let filter = FilterConfig::new().facet(path("status"), "all");
        assert!(filter.is_unconstrained());
        assert_eq!(filter_indices(&users(), &filter, &[path("name")]), [0, 1, 2]);
    }

    #[test]
    fn search_and_facet_combine_with_and() {
        let filter = FilterConfig::new()
            .query("smith")
            .facet(path("status"), "inactive");
        assert!(!filter.is_unconstrained());
        assert_eq!(filter_indices(&users(), &filter, &[path("name")]), [2]);
    }

    #[test]
    fn query_without_search_paths_matches_nothing() {
        let filter = FilterConfig::new().query("smith");
        assert!(filter_indices(&users(), &filter, &[]).is_empty());
    }

    #[test]
    fn deserializes_with_defaults() {
        let filter: FilterConfig = serde_json::from_str(r#"{"query": "ann"}"#).unwrap();
        assert_eq!(filter.query, "ann");
        assert!(filter.facets.is_empty());
    }
}
