//! Free-text search across several fields.

use crate::accessor::FieldSource;
use crate::path::FieldPath;

/// Case-insensitive "search anywhere" predicate.
///
/// A record matches when the lower-cased text form of **any** of the
/// configured fields contains the lower-cased query. An empty query matches
/// every record.
///
/// # Example
///
/// ```
/// use backoffice_view::{FieldPath, SearchPredicate};
/// use serde_json::json;
///
/// let paths = vec![FieldPath::parse("lastName").unwrap()];
/// let search = SearchPredicate::new("smith", &paths);
/// assert!(search.matches(&json!({"lastName": "Smithson"})));
/// assert!(!search.matches(&json!({"lastName": "Jones"})));
/// ```
#[derive(Debug, Clone)]
pub struct SearchPredicate<'p> {
    needle: String,
    paths: &'p [FieldPath],
}

impl<'p> SearchPredicate<'p> {
    /// Creates a predicate for `query` over `paths`.
    pub fn new(query: &str, paths: &'p [FieldPath]) -> Self {
        SearchPredicate {
            needle: query.to_lowercase(),
            paths,
        }
    }

    /// Returns `true` if the query is empty and every record matches.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Tests one record.
    pub fn matches<R: FieldSource + ?Sized>(&self, record: &R) -> bool {
        if self.is_empty() {
            return true;
        }
        self.paths.iter().any(|path| {
            record
                .resolve(path)
                .to_text()
                .to_lowercase()
                .contains(&self.needle)
        })
    }
}

/// Shorthand for `SearchPredicate::new(query, paths).matches(record)`.
pub fn matches_search<R: FieldSource + ?Sized>(record: &R, query: &str, paths: &[FieldPath]) -> bool {
    SearchPredicate::new(query, paths).matches(record)
}
