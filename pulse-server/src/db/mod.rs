//! Database queries
//!
//! Plain sqlx queries with manual row mapping. UUIDs are stored as TEXT,
//! timestamps as RFC 3339 TEXT, and question rules/options/conditions as
//! JSON columns.

pub mod campaigns;
pub mod responses;
pub mod surveys;

use chrono::{DateTime, Utc};
use pulse_common::{Error, Result};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Parse a UUID column; stored values are written by this service, so a
/// parse failure is data corruption, not bad input.
pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| Error::Internal(format!("invalid uuid '{}': {}", raw, e)))
}

/// Parse an RFC 3339 timestamp column
pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("invalid timestamp '{}': {}", raw, e)))
}

/// Decode an optional JSON column, treating NULL as the type's default
pub(crate) fn parse_json_column<T>(raw: Option<String>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match raw {
        Some(text) if !text.is_empty() => Ok(serde_json::from_str(&text)?),
        _ => Ok(T::default()),
    }
}
