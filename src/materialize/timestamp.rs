use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::core::{DbError, Result};

/// Label used in errors when no explicit format is configured.
pub const RFC3339: &str = "RFC3339";

/// Parses a timestamp column.
///
/// Without a format the text must be RFC 3339. With a format, offset-aware
/// input is tried first, then a naive date-time read as UTC, then a bare
/// date at midnight UTC.
pub fn parse_timestamp(text: &str, format: Option<&str>) -> Result<DateTime<Utc>> {
    let Some(format) = format else {
        return DateTime::parse_from_rfc3339(text)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|source| DbError::TimestampParse {
                value: text.to_string(),
                format: RFC3339.to_string(),
                source,
            });
    };

    if let Ok(ts) = DateTime::parse_from_str(text, format) {
        return Ok(ts.with_timezone(&Utc));
    }
    let source = match NaiveDateTime::parse_from_str(text, format) {
        Ok(ts) => return Ok(ts.and_utc()),
        Err(err) => err,
    };
    let midnight = NaiveDate::parse_from_str(text, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0));
    match midnight {
        Some(ts) => Ok(ts.and_utc()),
        None => Err(DbError::TimestampParse {
            value: text.to_string(),
            format: format.to_string(),
            source,
        }),
    }
}

/// Renders a timestamp the way `parse_timestamp` reads it back.
pub fn format_timestamp(ts: &DateTime<Utc>, format: Option<&str>) -> String {
    match format {
        Some(format) => ts.format(format).to_string(),
        None => ts.to_rfc3339(),
    }
}
