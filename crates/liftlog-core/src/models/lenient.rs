// ABOUTME: Lenient serde helpers for upstream payload fields with inconsistent JSON types
// ABOUTME: Numbers may arrive as strings, nulls, or be missing entirely
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! The upstream fitness API is not strict about JSON types: set capacities show up as
//! `12.5`, `"12.5"` or `null` depending on the endpoint version. These helpers make
//! such fields deserialize to a usable value instead of failing the whole payload.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Epoch values above this are treated as milliseconds rather than seconds
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Deserialize a number that may be encoded as a string, null, or missing (defaults to 0)
///
/// # Errors
///
/// Never fails for well-formed JSON; unparseable values become `0.0`
pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64).unwrap_or(0.0))
}

/// Deserialize a 0/1, bool, or string flag
///
/// # Errors
///
/// Never fails for well-formed JSON; unrecognized values become `false`
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(other) => value_as_f64(&other).is_some_and(|n| n >= 1.0),
        None => false,
    })
}

/// Deserialize an optional timestamp from epoch seconds/millis or a date-time string
///
/// # Errors
///
/// Never fails for well-formed JSON; unparseable values become `None`
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_timestamp))
}

/// Deserialize an optional non-empty string, trimming whitespace
///
/// # Errors
///
/// Never fails for well-formed JSON; non-string values become `None`
pub fn trimmed_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        _ => None,
    })
}

/// Deserialize an optional list, dropping elements that do not parse
///
/// A value that is not an array at all becomes `None`, so one malformed exercise or set
/// costs only itself and never the rest of the payload.
///
/// # Errors
///
/// Never fails for well-formed JSON
pub fn vec_skip_invalid<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

fn value_as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn value_as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(epoch_to_datetime),
        Value::String(s) => parse_timestamp(s),
        _ => None,
    }
}

/// Parse a timestamp string in any of the formats the upstream API uses
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(epoch) = raw.parse::<i64>() {
        return epoch_to_datetime(epoch);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Parse a calendar date (`YYYY-MM-DD`, optionally followed by a time part)
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn epoch_to_datetime(epoch: i64) -> Option<DateTime<Utc>> {
    if epoch <= 0 {
        return None;
    }
    if epoch >= EPOCH_MILLIS_THRESHOLD {
        Utc.timestamp_millis_opt(epoch).single()
    } else {
        Utc.timestamp_opt(epoch, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "f64_or_zero")]
        amount: f64,
        #[serde(default, deserialize_with = "timestamp")]
        at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "flag")]
        done: bool,
    }

    #[test]
    fn test_numbers_accept_strings_and_nulls() {
        let probe: Probe = serde_json::from_str(r#"{"amount": "12.5", "done": 1}"#).unwrap();
        assert!((probe.amount - 12.5).abs() < f64::EPSILON);
        assert!(probe.done);

        let probe: Probe = serde_json::from_str(r#"{"amount": null, "done": "0"}"#).unwrap();
        assert!(probe.amount.abs() < f64::EPSILON);
        assert!(!probe.done);

        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert!(probe.amount.abs() < f64::EPSILON);
        assert!(probe.at.is_none());
    }

    #[test]
    fn test_timestamps_accept_epoch_millis_and_strings() {
        let probe: Probe = serde_json::from_str(r#"{"at": 1717243200000}"#).unwrap();
        assert_eq!(probe.at.unwrap().hour(), 12);

        let parsed = parse_timestamp("2024-06-01 18:30:00").unwrap();
        assert_eq!(parsed.hour(), 18);
        assert_eq!(parsed.minute(), 30);

        assert!(parse_timestamp("not a time").is_none());
    }

    #[test]
    fn test_parse_date_ignores_time_suffix() {
        let date = parse_date("2024-06-01 08:00:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(parse_date("06/01/2024").is_none());
    }
}
