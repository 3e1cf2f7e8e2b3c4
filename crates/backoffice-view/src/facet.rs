//! Closed-set facet filters (status dropdowns and the like).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::accessor::FieldSource;
use crate::path::FieldPath;

/// Textual form of the "no constraint" sentinel.
pub const ALL: &str = "all";

/// The selected value of one facet.
///
/// Facet values come from closed enumerations (status codes, methods,
/// account types), so equality is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FacetValue {
    /// No constraint.
    #[default]
    All,
    /// The field's text form must equal this value exactly.
    Equals(String),
}

impl FacetValue {
    /// Creates an equality constraint.
    pub fn equals(value: impl Into<String>) -> Self {
        FacetValue::Equals(value.into())
    }

    /// Returns `true` for the "all" sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, FacetValue::All)
    }

    /// Tests the facet against one record field.
    ///
    /// A missing field never equals a concrete value.
    pub fn matches<R: FieldSource + ?Sized>(&self, record: &R, path: &FieldPath) -> bool {
        match self {
            FacetValue::All => true,
            FacetValue::Equals(expected) => {
                let value = record.resolve(path);
                !value.is_missing() && value.to_text() == expected.as_str()
            }
        }
    }
}

impl From<&str> for FacetValue {
    /// `"all"` becomes the sentinel; anything else is a concrete value.
    fn from(raw: &str) -> Self {
        if raw == ALL {
            FacetValue::All
        } else {
            FacetValue::Equals(raw.to_string())
        }
    }
}

impl From<String> for FacetValue {
    fn from(raw: String) -> Self {
        if raw == ALL {
            FacetValue::All
        } else {
            FacetValue::Equals(raw)
        }
    }
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::All => write!(f, "{}", ALL),
            FacetValue::Equals(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for FacetValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FacetValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(FacetValue::from(String::deserialize(deserializer)?))
    }
}

/// The conjunction of all active facets.
pub type Facets = BTreeMap<FieldPath, FacetValue>;

/// AND-combination of facet constraints.
#[derive(Debug, Clone, Copy)]
pub struct FacetFilter<'f> {
    facets: &'f Facets,
}

impl<'f> FacetFilter<'f> {
    /// Wraps a facet map.
    pub fn new(facets: &'f Facets) -> Self {
        FacetFilter { facets }
    }

    /// Returns `true` if no facet constrains anything.
    pub fn is_unconstrained(&self) -> bool {
        self.facets.values().all(FacetValue::is_all)
    }

    /// Tests one record; every non-"all" facet must match.
    pub fn matches<R: FieldSource + ?Sized>(&self, record: &R) -> bool {
        self.facets
            .iter()
            .all(|(path, facet)| facet.matches(record, path))
    }
}

/// Shorthand for `FacetFilter::new(facets).matches(record)`.
pub fn matches_facets<R: FieldSource + ?Sized>(record: &R, facets: &Facets) -> bool {
    FacetFilter::new(facets).matches(record)
}
