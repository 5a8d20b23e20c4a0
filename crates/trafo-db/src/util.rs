use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Value;
use thiserror::Error;
use trafo_core::coerce::parse_count;

/// Fixed-width so lexical order equals chronological order.
pub const BUSINESS_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid business date: {value}")]
    InvalidDate { value: String },
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },
}

pub fn encode_business_date(value: &NaiveDateTime) -> String {
    value.format(BUSINESS_DATE_FORMAT).to_string()
}

/// Accepts the stored layout plus looser shapes written by older tools.
pub fn decode_business_date(value: &str) -> Result<NaiveDateTime, DbError> {
    NaiveDateTime::parse_from_str(value, BUSINESS_DATE_FORMAT)
        .ok()
        .or_else(|| trafo_core::coerce::parse_business_date(value))
        .ok_or_else(|| DbError::InvalidDate {
            value: value.to_string(),
        })
}

pub fn to_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn from_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DbError::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// Dynamic SQL value to a counter: integer as-is, real truncated, text parsed, anything else 0.
#[allow(clippy::cast_possible_truncation)]
pub fn coerce_count(value: Value) -> i64 {
    match value {
        Value::Integer(number) => number,
        Value::Real(number) if number.is_finite() => number.trunc() as i64,
        Value::Text(text) => parse_count(&text),
        _ => 0,
    }
}
