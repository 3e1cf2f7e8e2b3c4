//! Payload adapter at the API boundary.
//!
//! List endpoints do not agree on a shape. Some return an array, some a
//! keyed map of records, some wrap either in a `{"data": ...}` envelope.
//! Everything is normalised to an array here, before the view engine sees
//! it.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ConsoleError, Result};

/// Key injected into keyed-map records that carry no `id` of their own.
pub const ID_FIELD: &str = "id";

/// Converts an API payload into a list of records.
///
/// - An array is returned as is.
/// - An object with a `data` field and no record siblings is an envelope:
///   `data` is unwrapped and converted recursively. Siblings such as
///   `total` or `page` are metadata and dropped.
/// - Any other object is a keyed map: its values become records, ordered
///   by key, and the key is stored as `id` when the record has none. A
///   record keyed `data` is kept like any other.
pub fn records_from_payload(payload: Value) -> Result<Vec<Value>> {
    match payload {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) if is_envelope(&map) => {
            match map.remove("data").unwrap_or(Value::Null) {
                inner @ (Value::Array(_) | Value::Object(_)) => records_from_payload(inner),
                other => Err(ConsoleError::UnexpectedPayload(format!(
                    "'data' holds {}",
                    kind(&other)
                ))),
            }
        }
        Value::Object(map) => keyed_map_to_records(map),
        other => Err(ConsoleError::UnexpectedPayload(format!(
            "expected a list or keyed map, got {}",
            kind(&other)
        ))),
    }
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.contains_key("data")
        && !map
            .iter()
            .any(|(key, value)| key != "data" && value.is_object())
}

fn keyed_map_to_records(map: Map<String, Value>) -> Result<Vec<Value>> {
    debug!(entries = map.len(), "converting keyed map payload");
    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    entries
        .into_iter()
        .map(|(key, record)| match record {
            Value::Object(mut fields) => {
                fields
                    .entry(ID_FIELD)
                    .or_insert_with(|| Value::String(key));
                Ok(Value::Object(fields))
            }
            other => Err(ConsoleError::UnexpectedPayload(format!(
                "entry '{key}' holds {}, not a record",
                kind(&other)
            ))),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
