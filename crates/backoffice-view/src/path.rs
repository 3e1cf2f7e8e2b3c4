//! Field paths into records.
//!
//! A [`FieldPath`] names where a value lives inside a record, possibly
//! through embedded records: `email`, `user.email`, `account.user.id`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ViewError};

/// Separator between path segments in the textual form.
pub const SEPARATOR: char = '.';

/// A validated, non-empty list of path segments.
///
/// # Example
///
/// ```
/// use backoffice_view::FieldPath;
///
/// let path: FieldPath = "user.email".parse().unwrap();
/// assert_eq!(path.segments(), ["user", "email"]);
/// assert_eq!(path.to_string(), "user.email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path such as `user.email`.
    pub fn parse(path: &str) -> Result<Self> {
        Self::from_segments(path.split(SEPARATOR))
    }

    /// Builds a path from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.trim().is_empty()) {
            return Err(ViewError::InvalidFieldPath(segments.join(".")));
        }
        Ok(FieldPath { segments })
    }

    /// Returns the path segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the last segment, which names the leaf field.
    pub fn leaf(&self) -> &str {
        // Non-empty by construction.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Returns `true` if the path walks through at least one embedded record.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        FieldPath::parse(s)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = ViewError;

    fn try_from(s: &str) -> Result<Self> {
        FieldPath::parse(s)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FieldPath::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_and_nested_paths() {
        let flat = FieldPath::parse("status").unwrap();
        assert_eq!(flat.segments(), ["status"]);
        assert!(!flat.is_nested());

        let nested = FieldPath::parse("user.email").unwrap();
        assert_eq!(nested.segments(), ["user", "email"]);
        assert_eq!(nested.leaf(), "email");
        assert!(nested.is_nested());
    }

    #[test]
    fn rejects_empty_paths_and_segments() {
        assert_eq!(
            FieldPath::parse(""),
            Err(ViewError::InvalidFieldPath(String::new()))
        );
        assert!(FieldPath::parse("user.").is_err());
        assert!(FieldPath::parse(".email").is_err());
        assert!(FieldPath::parse("user..email").is_err());
        assert!(FieldPath::from_segments(Vec::<String>::new()).is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let path: FieldPath = "account.user.lastName".parse().unwrap();
        assert_eq!(path.to_string(), "account.user.lastName");
    }

    #[test]
    fn serde_uses_dotted_string_form() {
        let path = FieldPath::parse("user.email").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"user.email\"");

        let back: FieldPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);

        let bad: std::result::Result<FieldPath, _> = serde_json::from_str("\"a..b\"");
        assert!(bad.is_err());
    }
}
