//! Timestamp utilities

use chrono::{DateTime, Utc};

use crate::{Error, Result};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert milliseconds to duration
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidInput(format!("bad timestamp '{}': {}", value, e)))
}

/// Identifier of the form `<prefix><epoch millis>`, used for generated
/// divergences, transactions and protocols
pub fn stamped_id(prefix: &str) -> String {
    format!("{}{}", prefix, now().timestamp_millis())
}
