//! Timestamp handling for the ÖBB timetable API.
//!
//! The API exchanges local (Europe/Vienna) wall-clock timestamps without an
//! offset, e.g. `"2024-03-15T10:04:00.000"`. The fractional part is sometimes
//! omitted, so parsing accepts both forms.

use chrono::NaiveDateTime;

/// Wire format used for request and response timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Format accepted when parsing; `%.f` tolerates a missing fraction.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Error returned when a timestamp cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {value:?}: {reason}")]
pub struct TimeError {
    value: String,
    reason: String,
}

/// Parse a required API timestamp.
///
/// # Examples
///
/// ```
/// use oebb_cli::domain::parse_timestamp;
///
/// let t = parse_timestamp("2024-03-15T10:04:00.000").unwrap();
/// assert_eq!(t.format("%H:%M").to_string(), "10:04");
///
/// assert!(parse_timestamp("10:04").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TimeError> {
    NaiveDateTime::parse_from_str(s.trim(), PARSE_FORMAT).map_err(|e| TimeError {
        value: s.to_string(),
        reason: e.to_string(),
    })
}

/// Parse an optional API timestamp.
///
/// Absent, empty and whitespace-only values all mean "no timestamp".
pub fn parse_optional_timestamp(s: Option<&str>) -> Result<Option<NaiveDateTime>, TimeError> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value).map(Some),
    }
}

/// Format a timestamp the way the API expects it in requests.
pub fn format_timestamp(t: &NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn parse_with_millis() {
        let t = parse_timestamp("2024-03-15T10:04:00.000").unwrap();
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!((t.hour(), t.minute()), (10, 4));
    }

    #[test]
    fn parse_without_fraction() {
        let t = parse_timestamp("2024-03-15T23:59:30").unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (23, 59, 30));
    }

    #[test]
    fn reject_garbage() {
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("tomorrow").is_err());
        assert!(parse_timestamp("2024-03-15").is_err());
    }

    #[test]
    fn optional_empty_is_none() {
        assert_eq!(parse_optional_timestamp(None).unwrap(), None);
        assert_eq!(parse_optional_timestamp(Some("")).unwrap(), None);
        assert_eq!(parse_optional_timestamp(Some("   ")).unwrap(), None);
    }

    #[test]
    fn optional_present_is_parsed() {
        let t = parse_optional_timestamp(Some("2024-03-15T10:09:00.000"))
            .unwrap()
            .unwrap();
        assert_eq!(t.minute(), 9);
    }

    #[test]
    fn optional_invalid_is_error() {
        assert!(parse_optional_timestamp(Some("soon")).is_err());
    }

    #[test]
    fn format_matches_wire() {
        let t = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_milli_opt(8, 5, 0, 120)
            .unwrap();
        assert_eq!(format_timestamp(&t), "2024-03-15T08:05:00.120");
        assert_eq!(parse_timestamp(&format_timestamp(&t)).unwrap(), t);
    }

    #[test]
    fn error_names_value() {
        let err = parse_timestamp("nope").unwrap_err();
        assert!(err.to_string().contains("\"nope\""));
    }
}
