//! Timestamp normalization helpers
//!
//! Jira delivers datetimes as ISO-8601 strings with varying offset notations
//! (`Z`, `+01:00`, `+0100`) and date-only fields as plain `YYYY-MM-DD`. The
//! exporter reduces all of them to a date string in the configured time zone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::domain::ExporterError;

/// Output date format used for all exported timestamps
pub const DATE_PATTERN: &str = "%Y-%m-%d";

/// Resolve an IANA time zone name, defaulting to UTC for an empty value.
pub fn parse_time_zone(name: &str) -> Result<Tz, ExporterError> {
    if name.is_empty() {
        return Ok(Tz::UTC);
    }
    name.parse::<Tz>()
        .map_err(|_| ExporterError::Configuration(format!("unknown time zone '{name}' in YAML configuration file")))
}

/// Convert an ISO-8601 timestamp to a date string in the given time zone.
///
/// Accepts full datetimes with `Z` or numeric offsets, naive datetimes
/// (assumed UTC) and bare dates. Anything else is an
/// [`ExporterError::InvalidTimestamp`].
///
/// # Example
/// ```rust
/// use jirex::utils::date::zoned_date;
///
/// let date = zoned_date("2023-01-15T23:30:00.000+0000", &chrono_tz::Tz::UTC).unwrap();
/// assert_eq!(date, "2023-01-15");
/// ```
pub fn zoned_date(timestamp: &str, time_zone: &Tz) -> Result<String, ExporterError> {
    let utc = parse_utc(timestamp)?;
    Ok(utc.with_timezone(time_zone).format(DATE_PATTERN).to_string())
}

fn parse_utc(timestamp: &str) -> Result<DateTime<Utc>, ExporterError> {
    // RFC 3339 covers the `Z` and `+01:00` notations.
    if let Ok(datetime) = DateTime::parse_from_rfc3339(timestamp) {
        return Ok(datetime.with_timezone(&Utc));
    }

    // Jira's REST payloads use a compact offset without a colon.
    if let Ok(datetime) = DateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(datetime.with_timezone(&Utc));
    }

    // Naive datetimes are taken as UTC.
    if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    // Date-only values (e.g. due dates).
    if let Ok(date) = NaiveDate::parse_from_str(timestamp, DATE_PATTERN) {
        let naive = date.and_hms_opt(0, 0, 0).ok_or_else(|| ExporterError::InvalidTimestamp(timestamp.to_string()))?;
        return Ok(Utc.from_utc_datetime(&naive));
    }

    Err(ExporterError::InvalidTimestamp(timestamp.to_string()))
}
