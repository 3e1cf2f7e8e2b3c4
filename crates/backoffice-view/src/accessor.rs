//! Field resolution on records.
//!
//! [`FieldSource`] is the single seam between the engine and the shape of
//! the data. It is implemented for loosely-typed JSON payloads and can be
//! implemented by hand for typed structs.

use serde_json::{Map, Value as Json};

use crate::path::FieldPath;
use crate::value::Value;

/// A record the engine can read fields from.
///
/// Resolution never fails: a missing intermediate record or leaf resolves
/// to [`Value::Missing`], which every consumer treats as a neutral value.
///
/// # Manual Implementation
///
/// ```
/// use backoffice_view::{FieldPath, FieldSource, Value};
///
/// struct Deposit {
///     amount: f64,
///     user_email: Option<String>,
/// }
///
/// impl FieldSource for Deposit {
///     fn resolve(&self, path: &FieldPath) -> Value<'_> {
///         match path.to_string().as_str() {
///             "amount" => Value::Number(self.amount),
///             "user.email" => self
///                 .user_email
///                 .as_deref()
///                 .map_or(Value::Missing, Value::String),
///             _ => Value::Missing,
///         }
///     }
/// }
/// ```
pub trait FieldSource {
    /// Returns the value at `path`, or [`Value::Missing`].
    fn resolve(&self, path: &FieldPath) -> Value<'_>;
}

impl FieldSource for Json {
    fn resolve(&self, path: &FieldPath) -> Value<'_> {
        let mut node = self;
        for segment in path.segments() {
            node = match step(node, segment) {
                Some(next) => next,
                None => return Value::Missing,
            };
        }
        scalar(node)
    }
}

impl FieldSource for Map<String, Json> {
    fn resolve(&self, path: &FieldPath) -> Value<'_> {
        let (first, rest) = match path.segments().split_first() {
            Some(split) => split,
            None => return Value::Missing,
        };
        let mut node = match self.get(first) {
            Some(node) => node,
            None => return Value::Missing,
        };
        for segment in rest {
            node = match step(node, segment) {
                Some(next) => next,
                None => return Value::Missing,
            };
        }
        scalar(node)
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn resolve(&self, path: &FieldPath) -> Value<'_> {
        (**self).resolve(path)
    }
}

/// Resolves `path` on `record`.
///
/// Free-function form of [`FieldSource::resolve`].
pub fn resolve<'a, R: FieldSource + ?Sized>(record: &'a R, path: &FieldPath) -> Value<'a> {
    record.resolve(path)
}

fn step<'a>(node: &'a Json, segment: &str) -> Option<&'a Json> {
    match node {
        Json::Object(map) => map.get(segment),
        Json::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn scalar(node: &Json) -> Value<'_> {
    match node {
        Json::String(s) => Value::String(s),
        Json::Number(n) => number(n),
        Json::Bool(b) => Value::Bool(*b),
        // Embedded records and lists are not comparable scalars.
        Json::Null | Json::Object(_) | Json::Array(_) => Value::Missing,
    }
}

fn number(n: &serde_json::Number) -> Value<'_> {
    if let Some(i) = n.as_i64() {
        Value::Integer(i128::from(i))
    } else if let Some(u) = n.as_u64() {
        Value::Integer(i128::from(u))
    } else {
        n.as_f64().map_or(Value::Missing, Value::Number)
    }
}
