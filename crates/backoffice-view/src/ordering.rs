//! Type-aware, stable, multi-field ordering.
//!
//! Provides [`Direction`], [`ValueKind`], [`SortKey`] and [`SortConfig`],
//! plus the comparator that list screens sort with.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::accessor::FieldSource;
use crate::error::ViewError;
use crate::path::FieldPath;
use crate::value::{Timestamp, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Direction {
    /// Applies this direction to an ascending comparison.
    ///
    /// `Desc` negates the result, so `Equal` stays `Equal` and ties keep
    /// their upstream order under a stable sort.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }

    /// Returns the opposite direction.
    pub fn flipped(self) -> Direction {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(ViewError::UnknownDirection(s.to_string())),
        }
    }
}

/// How a sort field's values are interpreted.
///
/// Declared per column by the caller; the engine never guesses. A money
/// column stored as strings must be declared `Number` to sort numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Numeric; non-numeric values coerce to `0`.
    Number,
    /// Instant; unparsable values coerce to the epoch.
    Date,
    /// Case-normalized lexical.
    #[default]
    String,
}

impl ValueKind {
    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::Date => "date",
            ValueKind::String => "string",
        }
    }

    /// Coerces a resolved value into a comparable key of this kind.
    pub fn key(self, value: &Value<'_>) -> SortValue {
        match self {
            ValueKind::Number => SortValue::Number(value.to_number()),
            ValueKind::Date => SortValue::Date(value.to_timestamp()),
            ValueKind::String => SortValue::Text(value.to_text().to_lowercase()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "number" => Ok(ValueKind::Number),
            "date" => Ok(ValueKind::Date),
            "string" => Ok(ValueKind::String),
            _ => Err(ViewError::UnknownValueKind(s.to_string())),
        }
    }
}

/// A coerced sort key. Both sides of a comparison always share a variant
/// because they come from the same [`ValueKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Numeric key (never NaN).
    Number(f64),
    /// Instant key.
    Date(Timestamp),
    /// Lower-cased text key.
    Text(String),
}

impl SortValue {
    /// Ascending comparison.
    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// One sort column: field, direction and declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// The field to sort by.
    pub field: FieldPath,
    /// The sort direction.
    #[serde(default)]
    pub direction: Direction,
    /// How the field's values compare.
    #[serde(default)]
    pub kind: ValueKind,
}

impl SortKey {
    /// Creates a sort key.
    pub fn new(field: FieldPath, kind: ValueKind, direction: Direction) -> Self {
        SortKey {
            field,
            direction,
            kind,
        }
    }

    /// Creates an ascending sort key.
    pub fn asc(field: FieldPath, kind: ValueKind) -> Self {
        SortKey::new(field, kind, Direction::Asc)
    }

    /// Creates a descending sort key.
    pub fn desc(field: FieldPath, kind: ValueKind) -> Self {
        SortKey::new(field, kind, Direction::Desc)
    }

    /// Compares two records on this key.
    pub fn compare<A, B>(&self, a: &A, b: &B) -> Ordering
    where
        A: FieldSource + ?Sized,
        B: FieldSource + ?Sized,
    {
        let left = self.kind.key(&a.resolve(&self.field));
        let right = self.kind.key(&b.resolve(&self.field));
        self.direction.apply(left.compare(&right))
    }
}

/// Sort state of a list screen.
///
/// Keys apply in order: the first is the primary column, later keys break
/// ties. No keys means "preserve input order".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Sort keys, primary first.
    pub keys: Vec<SortKey>,
}

impl SortConfig {
    /// No sorting; input order is preserved.
    pub fn none() -> Self {
        SortConfig::default()
    }

    /// Sorts by a single key.
    pub fn by(key: SortKey) -> Self {
        SortConfig { keys: vec![key] }
    }

    /// Adds a tie-breaking key.
    pub fn then_by(mut self, key: SortKey) -> Self {
        self.keys.push(key);
        self
    }

    /// Returns `true` if input order is preserved.
    pub fn is_none(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the primary key, if any.
    pub fn primary(&self) -> Option<&SortKey> {
        self.keys.first()
    }

    /// Column-header click: the current primary column flips direction;
    /// any other column becomes the only key, ascending.
    pub fn toggle(&mut self, field: FieldPath, kind: ValueKind) {
        match self.keys.first_mut() {
            Some(primary) if primary.field == field => {
                primary.direction = primary.direction.flipped();
                primary.kind = kind;
            }
            _ => self.keys = vec![SortKey::asc(field, kind)],
        }
    }

    /// Compares two records; `Equal` when every key ties.
    pub fn compare<A, B>(&self, a: &A, b: &B) -> Ordering
    where
        A: FieldSource + ?Sized,
        B: FieldSource + ?Sized,
    {
        for key in &self.keys {
            let ordering = key.compare(a, b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Stable-sorts `indices` into `records` by `sort`.
///
/// Keys are coerced once per record before sorting. Indices that compare
/// equal keep their incoming relative order.
pub fn sort_indices<R: FieldSource>(records: &[R], indices: &mut Vec<usize>, sort: &SortConfig) {
    if sort.is_none() || indices.len() < 2 {
        return;
    }

    let mut decorated: Vec<(Vec<SortValue>, usize)> = indices
        .iter()
        .map(|&i| {
            let keys = sort
                .keys
                .iter()
                .map(|key| key.kind.key(&records[i].resolve(&key.field)))
                .collect();
            (keys, i)
        })
        .collect();

    // `sort_by` is stable.
    decorated.sort_by(|(a, _), (b, _)| {
        for ((left, right), key) in a.iter().zip(b).zip(&sort.keys) {
            let ordering = key.direction.apply(left.compare(right));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });

    indices.clear();
    indices.extend(decorated.into_iter().map(|(_, i)| i));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value as Json};

    fn path(p: &str) -> FieldPath {
        FieldPath::parse(p).unwrap()
    }

    fn sorted(records: &[Json], sort: &SortConfig) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..records.len()).collect();
        sort_indices(records, &mut idx, sort);
        idx
    }

    #[test]
    fn direction_apply_negates() {
        assert_eq!(Direction::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Direction::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Direction::Desc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Direction::Asc.flipped(), Direction::Desc);
    }

    #[test]
    fn parses_names() {
        assert_eq!("DESC".parse::<Direction>().unwrap(), Direction::Desc);
        assert_eq!("date".parse::<ValueKind>().unwrap(), ValueKind::Date);
        assert_eq!(
            "money".parse::<ValueKind>(),
            Err(ViewError::UnknownValueKind("money".into()))
        );
        assert!("up".parse::<Direction>().is_err());
    }

    #[test]
    fn no_keys_preserves_input_order() {
        let records = vec![json!({"a": 3}), json!({"a": 1}), json!({"a": 2})];
        assert_eq!(sorted(&records, &SortConfig::none()), [0, 1, 2]);
        assert_eq!(
            SortConfig::none().compare(&records[0], &records[1]),
            Ordering::Equal
        );
    }

    #[test]
    fn numeric_strings_sort_numerically_and_stably() {
        let records = vec![
            json!({"id": 1, "amount": "10.00"}),
            json!({"id": 2, "amount": "2.50"}),
            json!({"id": 3, "amount": "10.00"}),
        ];
        let sort = SortConfig::by(SortKey::asc(path("amount"), ValueKind::Number));
        assert_eq!(sorted(&records, &sort), [1, 0, 2]);

        let desc = SortConfig::by(SortKey::desc(path("amount"), ValueKind::Number));
        assert_eq!(sorted(&records, &desc), [0, 2, 1]);
    }

    #[test]
    fn same_strings_as_text_sort_lexically() {
        let records = vec![json!({"amount": "10.00"}), json!({"amount": "2.50"})];
        let sort = SortConfig::by(SortKey::asc(path("amount"), ValueKind::String));
        assert_eq!(sorted(&records, &sort), [0, 1]);
    }

    #[test]
    fn missing_numbers_are_zero() {
        let records = vec![json!({"amount": 5}), json!({}), json!({"amount": -1})];
        let sort = SortConfig::by(SortKey::asc(path("amount"), ValueKind::Number));
        assert_eq!(sorted(&records, &sort), [2, 1, 0]);
    }

    #[test]
    fn dates_compare_as_instants_with_missing_first() {
        let records = vec![
            json!({"createdAt": "2024-03-01T10:00:00Z"}),
            json!({"createdAt": "garbage"}),
            json!({"createdAt": "2023-12-31"}),
            json!({}),
        ];
        let sort = SortConfig::by(SortKey::asc(path("createdAt"), ValueKind::Date));
        assert_eq!(sorted(&records, &sort), [1, 3, 2, 0]);
    }

    #[test]
    fn strings_compare_case_normalized() {
        let records = vec![
            json!({"name": "bob"}),
            json!({"name": "Alice"}),
            json!({"name": "alice"}),
            json!({"name": "Carol"}),
        ];
        let sort = SortConfig::by(SortKey::asc(path("name"), ValueKind::String));
        assert_eq!(sorted(&records, &sort), [1, 2, 0, 3]);
    }

    #[test]
    fn secondary_keys_break_ties() {
        let records = vec![
            json!({"status": "active", "balance": 5}),
            json!({"status": "active", "balance": 50}),
            json!({"status": "closed", "balance": 1}),
        ];
        let sort = SortConfig::by(SortKey::asc(path("status"), ValueKind::String))
            .then_by(SortKey::desc(path("balance"), ValueKind::Number));
        assert_eq!(sorted(&records, &sort), [1, 0, 2]);
        assert_eq!(sort.compare(&records[1], &records[0]), Ordering::Less);
    }

    #[test]
    fn toggle_flips_then_replaces() {
        let mut sort = SortConfig::none();
        sort.toggle(path("amount"), ValueKind::Number);
        assert_eq!(
            sort.primary(),
            Some(&SortKey::asc(path("amount"), ValueKind::Number))
        );

        sort.toggle(path("amount"), ValueKind::Number);
        assert_eq!(sort.primary().unwrap().direction, Direction::Desc);

        sort.toggle(path("createdAt"), ValueKind::Date);
        assert_eq!(sort.keys, vec![SortKey::asc(path("createdAt"), ValueKind::Date)]);
    }

    #[test]
    fn sort_config_serde_defaults() {
        let sort: SortConfig =
            serde_json::from_str(r#"{"keys": [{"field": "user.email"}]}"#).unwrap();
        assert_eq!(sort.keys[0].field, path("user.email"));
        assert_eq!(sort.keys[0].direction, Direction::Asc);
        assert_eq!(sort.keys[0].kind, ValueKind::String);
    }
}
