//! Runtime values resolved from records.
//!
//! The [`Value`] enum is what a [`FieldSource`](crate::FieldSource) hands back
//! for a [`FieldPath`](crate::FieldPath). Comparison, search and export all
//! work on `Value`, so every consumer matches on the same closed set of
//! variants instead of probing raw payload types.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A scalar value borrowed from a record.
///
/// # Example
///
/// ```
/// use backoffice_view::Value;
///
/// assert_eq!(Value::String("10.50").to_number(), 10.5);
/// assert_eq!(Value::String("n/a").to_number(), 0.0);
/// assert_eq!(Value::Missing.to_text(), "");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Integral number, kept exact so ids and account numbers print as given.
    Integer(i128),
    /// Fractional number.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Instant, for typed sources that already hold a parsed date.
    Date(Timestamp),
    /// Field absent, null, or not a scalar.
    Missing,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `Missing` value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical text form used by search, facets and export.
    ///
    /// `Missing` is the empty string. Numbers print without a trailing
    /// `.0` (`10`, `2.5`), booleans as `true`/`false`, dates as RFC 3339.
    pub fn to_text(&self) -> Cow<'a, str> {
        match self {
            Value::String(s) => Cow::Borrowed(s),
            Value::Integer(n) => Cow::Owned(n.to_string()),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Date(ts) => Cow::Owned(ts.to_string()),
            Value::Missing => Cow::Borrowed(""),
        }
    }

    /// Numeric coercion. Anything non-numeric becomes `0`.
    ///
    /// Strings are trimmed and parsed, so amounts stored as `"10.00"`
    /// compare numerically. `NaN` is folded to `0` to keep ordering total.
    pub fn to_number(&self) -> f64 {
        let n = match self {
            Value::Integer(n) => *n as f64,
            Value::Number(n) => *n,
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Date(ts) => ts.as_millis() as f64,
            Value::Missing => 0.0,
        };
        if n.is_nan() {
            0.0
        } else {
            n
        }
    }

    /// Date coercion. Anything unparsable becomes the epoch.
    ///
    /// Numbers, and strings of digits, are read as milliseconds since the
    /// epoch.
    pub fn to_timestamp(&self) -> Timestamp {
        match self {
            Value::Date(ts) => *ts,
            Value::String(s) => Timestamp::parse(s).unwrap_or(Timestamp::EPOCH),
            Value::Integer(n) => i64::try_from(*n).map_or(Timestamp::EPOCH, Timestamp),
            Value::Number(n) if n.is_finite() => Timestamp(*n as i64),
            _ => Timestamp::EPOCH,
        }
    }
}

/// Instant represented as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// 1970-01-01T00:00:00Z, the value unparsable dates coerce to.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Parses the date shapes admin payloads carry.
    ///
    /// Accepts RFC 3339 (`2024-03-01T10:00:00Z`, with offset or fraction),
    /// naive date-times with `T` or a space, and bare dates. Naive forms
    /// are read as UTC. A bare run of digits, optionally signed, is epoch
    /// milliseconds.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let digits = raw.strip_prefix('-').unwrap_or(raw);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return raw.parse::<i64>().ok().map(Timestamp);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Timestamp(dt.timestamp_millis()));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(Timestamp(naive.and_utc().timestamp_millis()));
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Timestamp(naive.and_utc().timestamp_millis()))
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp_millis(self.0) {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_forms() {
        assert_eq!(Value::String("Smith").to_text(), "Smith");
        assert_eq!(Value::Number(10.0).to_text(), "10");
        assert_eq!(Value::Number(2.5).to_text(), "2.5");
        assert_eq!(Value::Integer(9_007_199_254_740_993).to_text(), "9007199254740993");
        assert_eq!(Value::Bool(true).to_text(), "true");
        assert_eq!(Value::Missing.to_text(), "");
        assert_eq!(
            Value::Date(Timestamp::EPOCH).to_text(),
            "1970-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(Value::String("10.00").to_number(), 10.0);
        assert_eq!(Value::String(" 2.50 ").to_number(), 2.5);
        assert_eq!(Value::String("-3").to_number(), -3.0);
        assert_eq!(Value::String("abc").to_number(), 0.0);
        assert_eq!(Value::String("").to_number(), 0.0);
        assert_eq!(Value::String("NaN").to_number(), 0.0);
        assert_eq!(Value::Bool(true).to_number(), 1.0);
        assert_eq!(Value::Integer(-7).to_number(), -7.0);
        assert_eq!(Value::Missing.to_number(), 0.0);
        assert_eq!(Value::Number(f64::NAN).to_number(), 0.0);
    }

    #[test]
    fn date_parsing_shapes() {
        let day = Timestamp::parse("2024-03-01").unwrap();
        assert_eq!(day, Timestamp::parse("2024-03-01T00:00:00Z").unwrap());
        assert_eq!(day, Timestamp::parse("2024-03-01 00:00:00").unwrap());
        assert_eq!(day, Timestamp::parse("2024-03-01T00:00:00.000").unwrap());
        assert_eq!(
            Timestamp::parse("2024-03-01T02:00:00+02:00").unwrap(),
            day
        );
        assert_eq!(
            Timestamp::parse("1709287200000"),
            Some(Timestamp(1_709_287_200_000))
        );
        assert_eq!(Timestamp::parse("-1000"), Some(Timestamp(-1000)));
        assert!(Timestamp::parse("99999999999999999999").is_none());
        assert!(Timestamp::parse("-").is_none());
        assert!(Timestamp::parse("yesterday").is_none());
        assert!(Timestamp::parse("").is_none());
    }

    #[test]
    fn date_coercion_defaults_to_epoch() {
        assert_eq!(Value::String("not a date").to_timestamp(), Timestamp::EPOCH);
        assert_eq!(Value::Missing.to_timestamp(), Timestamp::EPOCH);
        assert_eq!(Value::Bool(true).to_timestamp(), Timestamp::EPOCH);
        assert_eq!(Value::Number(1500.0).to_timestamp(), Timestamp(1500));
        assert_eq!(Value::Integer(1500).to_timestamp(), Timestamp(1500));
        assert_eq!(
            Value::String("1709287200000").to_timestamp(),
            Timestamp(1_709_287_200_000)
        );
    }

    #[test]
    fn timestamp_conversions() {
        assert_eq!(Timestamp::from_secs(2).as_millis(), 2000);
        assert!(Timestamp(1000) < Timestamp(2000));
    }
}
