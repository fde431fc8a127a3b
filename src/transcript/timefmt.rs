use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::debug;

use super::content::{has_content, raw_text};

pub const PLACEHOLDER: &str = "-";

const DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p";
// chrono accepts one or two digits for %d when parsing.
const DISPLAY_PARSE_FORMAT: &str = "%b %d, %Y, %I:%M %p";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Content-empty cells render as `-`. Values that cannot be read as a
/// calendar date come back unchanged.
pub fn format_timestamp(value: Option<&Value>) -> String {
    let Some(value) = value.filter(|v| has_content(Some(v))) else {
        return PLACEHOLDER.to_string();
    };
    let raw = raw_text(value);
    let Value::String(text) = value else {
        return raw;
    };

    match parse_timestamp(text) {
        Some(parsed) => parsed.format(DISPLAY_FORMAT).to_string(),
        None => {
            debug!(input = %text, "Unparseable timestamp; showing raw value");
            raw
        }
    }
}

/// Parse a timestamp, converting a `YYYY-MM-DD HH:mm:ss` separator space
/// into `T` first. Offsets are kept as wall-clock time in that offset.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, DISPLAY_PARSE_FORMAT) {
        return Some(parsed);
    }

    let iso = trimmed.replacen(' ', "T", 1);
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&iso) {
        return Some(parsed.naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&iso, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fmt(value: Value) -> String {
        format_timestamp(Some(&value))
    }

    #[test]
    fn formats_sql_datetime_in_twelve_hour_clock() {
        let out = fmt(json!("2024-01-05 13:30:00"));
        assert!(out.contains("Jan 5, 2024"), "{out}");
        assert!(out.contains("01:30 PM"), "{out}");
        assert_eq!(fmt(json!("2024-03-01 09:00:00")), "Mar 1, 2024, 09:00 AM");
    }

    #[test]
    fn midnight_and_noon_use_twelve() {
        assert_eq!(fmt(json!("2023-12-31 00:05:00")), "Dec 31, 2023, 12:05 AM");
        assert_eq!(fmt(json!("2023-12-31 12:00:59")), "Dec 31, 2023, 12:00 PM");
    }

    #[test]
    fn accepts_iso_variants() {
        assert_eq!(fmt(json!("2024-03-01T09:00:00")), "Mar 1, 2024, 09:00 AM");
        assert_eq!(fmt(json!("2024-03-01 09:00:00.123456")), "Mar 1, 2024, 09:00 AM");
        assert_eq!(fmt(json!("2024-03-01T17:45:00+05:30")), "Mar 1, 2024, 05:45 PM");
        assert_eq!(fmt(json!("2024-03-01")), "Mar 1, 2024, 12:00 AM");
    }

    #[test]
    fn invalid_dates_are_returned_unchanged() {
        assert_eq!(fmt(json!("not-a-date")), "not-a-date");
        assert_eq!(fmt(json!("2024-02-30 10:00:00")), "2024-02-30 10:00:00");
        assert_eq!(fmt(json!(1700000000)), "1700000000");
    }

    #[test]
    fn empty_values_render_placeholder() {
        assert_eq!(format_timestamp(None), "-");
        assert_eq!(fmt(Value::Null), "-");
        assert_eq!(fmt(json!("")), "-");
        assert_eq!(fmt(json!("undefined")), "-");
    }

    #[test]
    fn formatting_is_idempotent() {
        let once = fmt(json!("2024-01-05 13:30:00"));
        let twice = fmt(json!(once.clone()));
        assert_eq!(once, twice);
    }
}
