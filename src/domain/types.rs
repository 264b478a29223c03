//! Value objects shared by the row types.
//!
//! Backend rows are untrusted: identifiers arrive as numbers or strings and
//! timestamps in several formats. These wrappers accept the variants we have
//! seen and reject everything else with a [`TypeConstraintError`].
use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Record identifier as the backend reports it, numeric or opaque.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash, Default)]
pub struct RecordId(String);

impl RecordId {
    /// Constructs a trimmed, non-empty identifier.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            Err(TypeConstraintError::EmptyString)
        } else {
            Ok(Self(trimmed))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for RecordId {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<Value> for RecordId {
    type Error = TypeConstraintError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Self::new(s),
            Value::Number(n) => Self::new(n.to_string()),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        RecordId::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Parses RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` and bare dates.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Serde helper: unknown timestamp formats become `None` instead of failing the row.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_timestamp(&s),
        _ => None,
    })
}

/// Serde helper: numbers sent as strings are accepted, garbage becomes `None`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Serde helper: counters default to zero when missing or malformed.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as u64)
        .unwrap_or_default())
}

/// Table cell rendering of an optional timestamp.
pub fn display_timestamp(value: Option<&NaiveDateTime>) -> String {
    value
        .map(|ts| ts.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_default()
}

/// Table cell rendering of an optional date.
pub fn display_date(value: Option<&NaiveDateTime>) -> String {
    value
        .map(|ts| ts.format("%d.%m.%Y").to_string())
        .unwrap_or_default()
}

pub fn display_optional(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        id: RecordId,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        at: Option<NaiveDateTime>,
        #[serde(default, deserialize_with = "lenient_count")]
        clicks: u64,
    }

    #[test]
    fn record_id_accepts_numbers_and_strings() {
        let numeric: Probe = serde_json::from_value(json!({"id": 42})).unwrap();
        let textual: Probe = serde_json::from_value(json!({"id": " abc "})).unwrap();

        assert_eq!(numeric.id.as_str(), "42");
        assert_eq!(textual.id.as_str(), "abc");
        assert!(serde_json::from_value::<Probe>(json!({"id": ""})).is_err());
        assert!(serde_json::from_value::<Probe>(json!({"id": null})).is_err());
    }

    #[test]
    fn timestamps_are_parsed_leniently() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2024-03-05T10:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05T13:30:00+03:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05 10:30:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp("yesterday"), None);

        let probe: Probe = serde_json::from_value(json!({"id": 1, "at": 17})).unwrap();
        assert_eq!(probe.at, None);
    }

    #[test]
    fn counts_default_to_zero() {
        let probe: Probe = serde_json::from_value(json!({"id": 1, "clicks": "12"})).unwrap();
        assert_eq!(probe.clicks, 12);

        let probe: Probe = serde_json::from_value(json!({"id": 1, "clicks": "many"})).unwrap();
        assert_eq!(probe.clicks, 0);

        let probe: Probe = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(probe.clicks, 0);
    }
}
