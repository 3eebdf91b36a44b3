use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn to_u8(value: i64, field: &str) -> Result<u8> {
    u8::try_from(value).map_err(|_| anyhow!("{field} out of range: {value}"))
}

pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y, %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Parse the date text written by browser logs: RFC 3339, en-US
/// `toLocaleString`/`toLocaleDateString` output, or ISO dates. Times without
/// an offset are taken as UTC.
pub fn parse_display_date(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(naive.and_utc());
            }
        }
    }

    Err(anyhow!("unrecognised date '{value}'"))
}
