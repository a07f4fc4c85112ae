// src/utils/time.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Parses a test date sent by a client.
///
/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date, which is
/// taken as midnight UTC (what a browser date input produces).
pub fn parse_test_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde adapter for optional test dates. Empty strings count as missing.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_test_date(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid test date '{}'", value))),
    }
}
