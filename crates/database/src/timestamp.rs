//! Stored timestamp format.
//!
//! Timestamps are TEXT in a fixed-width UTC form so that string comparison in
//! SQL orders them chronologically.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{DatabaseError, Result};

/// Format an instant for storage, e.g. `2024-03-01T12:00:00.000Z`.
pub fn to_sql(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp, naming the row it came from on failure.
pub fn from_sql(entity: &'static str, id: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DatabaseError::InvalidTimestamp {
            entity,
            id: id.to_string(),
            value: value.to_string(),
        })
}

/// Window bounds as bind parameters. `None` leaves that side open.
pub fn bounds(window: &ledger_core::DateWindow) -> (Option<String>, Option<String>) {
    (window.from().map(to_sql), window.to().map(to_sql))
}
