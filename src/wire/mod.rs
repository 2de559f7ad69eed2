//! Wire scalars and the coercion rules every response message follows.
//!
//! Response messages arrive as JSON in which any field may be missing, `null`,
//! or of an unexpected type. 64-bit counters travel as decimal strings and
//! timestamps as RFC 3339 strings. Nothing in this module fails: unreadable
//! values degrade to their defaults.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{DeserializeOwned, Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Field decoder that replaces a value of the wrong shape with the default.
///
/// Use together with `#[serde(default)]` so absent fields default as well.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// List decoder that coerces each element on its own.
///
/// A value that is not an array gives an empty list; an element of the wrong
/// shape becomes `T::default()` without affecting its neighbours.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| T::deserialize(item).unwrap_or_default())
        .collect())
}

/// Map decoder that coerces each value on its own, keeping every key
pub fn lenient_map<'de, D, V>(deserializer: D) -> Result<HashMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: DeserializeOwned + Default,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(HashMap::new());
    };
    Ok(entries
        .into_iter()
        .map(|(key, value)| (key, V::deserialize(value).unwrap_or_default()))
        .collect())
}

/// An integer counter as found on the wire
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum WireInt {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl WireInt {
    /// The counter value; 0 when absent or unreadable
    pub fn count(&self) -> i64 {
        match self {
            WireInt::Int(value) => *value,
            WireInt::Float(value) if value.is_finite() => value.trunc() as i64,
            WireInt::Text(text) => parse_count(text),
            _ => 0,
        }
    }
}

impl From<i64> for WireInt {
    fn from(value: i64) -> Self {
        WireInt::Int(value)
    }
}

impl From<&str> for WireInt {
    fn from(value: &str) -> Self {
        WireInt::Text(value.to_string())
    }
}

/// Parse the leading integer of `text`.
///
/// Leading whitespace and a sign are allowed; parsing stops at the first
/// non-digit. No digits, or a value outside `i64`, gives 0.
pub fn parse_count(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return 0;
    }

    // Parse sign and digits together so i64::MIN stays representable
    trimmed[..sign_len + digits].parse::<i64>().unwrap_or(0)
}

/// Parse a wire timestamp. Empty or unreadable input is `None`, never the epoch.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    // Offset-less values are taken as UTC
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a timestamp the way request messages carry it
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// `None` for an empty string, so "not set" is distinguishable from "set"
pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Coerce a breakdown map whose values are string-encoded counters
pub fn count_map(raw: HashMap<String, WireInt>) -> HashMap<String, i64> {
    raw.into_iter()
        .map(|(label, count)| (label, count.count()))
        .collect()
}

/// The raw tag of an enumeration value, kept when the value is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEnum {
    Number(i64),
    Name(String),
}

/// An enumeration field as found on the wire: usually a number or a name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum WireEnum {
    #[default]
    Null,
    Number(i64),
    Name(String),
    Float(f64),
    /// Booleans, arrays and objects
    Other(Value),
}

impl WireEnum {
    /// Decode into `E`. Absent values decode to `E::default()`, the zero member.
    pub fn decode<E: ClosedEnum>(self) -> E {
        match self {
            WireEnum::Null => E::default(),
            WireEnum::Number(number) => {
                E::from_number(number).unwrap_or_else(|| E::unrecognized(RawEnum::Number(number)))
            }
            WireEnum::Name(name) => {
                let upper = name.trim().to_ascii_uppercase();
                let short = upper.strip_prefix(E::NAME_PREFIX).unwrap_or(&upper);
                E::from_name(short).unwrap_or_else(|| E::unrecognized(RawEnum::Name(name)))
            }
            // Integral floats such as 3.0 are the number they spell
            WireEnum::Float(value)
                if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
            {
                WireEnum::Number(value as i64).decode()
            }
            WireEnum::Float(value) => E::unrecognized(RawEnum::Name(value.to_string())),
            WireEnum::Other(value) => E::unrecognized(RawEnum::Name(value.to_string())),
        }
    }
}

/// A protocol enumeration with a fixed set of known members.
///
/// Values outside the set are carried as `unrecognized` rather than rejected,
/// since servers may add members before clients learn about them.
pub trait ClosedEnum: Default {
    /// Prefix of the wire names, e.g. `DOMAIN_STATUS_`
    const NAME_PREFIX: &'static str;

    fn from_number(number: i64) -> Option<Self>;

    /// Look up an upper-case name with the prefix removed
    fn from_name(name: &str) -> Option<Self>;

    fn unrecognized(raw: RawEnum) -> Self;
}
