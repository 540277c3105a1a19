//! Slot date/time normalization and display formatting

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{AppError, AppResult};

/// Storage format for slot hours
const STORED_TIME_FORMAT: &str = "%H:%M";

const ACCEPTED_TIME_FORMATS: [&str; 5] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p", "%I:%M:%S %p"];

/// Parse a slot date into a calendar day.
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp (the day in the timestamp's own
/// offset is kept) or a naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_slot_date(raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    Err(AppError::Validation(format!("Invalid date: {}", raw)))
}

/// Parse a user-entered time. Blank input means "no time".
pub fn parse_time(raw: &str) -> AppResult<Option<NaiveTime>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    ACCEPTED_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .map(Some)
        .ok_or_else(|| AppError::Validation(format!("Invalid time: {}", raw)))
}

/// Normalize a start/end pair to stored `HH:MM` strings.
///
/// Both blank yields a placeholder (two empty strings). Otherwise both are
/// required and the end must come after the start.
pub fn normalize_slot_times(start: &str, end: &str) -> AppResult<(String, String)> {
    match (parse_time(start)?, parse_time(end)?) {
        (None, None) => Ok((String::new(), String::new())),
        (Some(s), Some(e)) if e > s => Ok((
            s.format(STORED_TIME_FORMAT).to_string(),
            e.format(STORED_TIME_FORMAT).to_string(),
        )),
        (Some(_), Some(_)) => Err(AppError::Validation(
            "endTime must be after startTime".to_string(),
        )),
        _ => Err(AppError::Validation(
            "startTime and endTime must be given together".to_string(),
        )),
    }
}

/// Read back a stored slot time; empty or unparsable values give `None`
pub fn stored_time(value: &str) -> Option<NaiveTime> {
    parse_time(value).ok().flatten()
}

fn display_time(t: NaiveTime) -> String {
    t.format("%-I:%M %p").to_string()
}

/// Human-readable window such as "8:00 AM - 10:00 AM".
/// Placeholder slots have no window and give an empty string.
pub fn format_expected_time(start: &str, end: &str) -> String {
    match (stored_time(start), stored_time(end)) {
        (Some(s), Some(e)) => format!("{} - {}", display_time(s), display_time(e)),
        (Some(s), None) => display_time(s),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(parse_slot_date("2026-03-14").unwrap(), expected);
        assert_eq!(parse_slot_date(" 2026-03-14T00:00:00Z ").unwrap(), expected);
        assert_eq!(parse_slot_date("2026-03-14T23:30:00+08:00").unwrap(), expected);
        assert_eq!(parse_slot_date("2026-03-14T09:15:00").unwrap(), expected);
        assert!(parse_slot_date("14/03/2026").is_err());
    }

    #[test]
    fn test_normalize_slot_times() {
        assert_eq!(
            normalize_slot_times("8:00", "10:00").unwrap(),
            ("08:00".to_string(), "10:00".to_string())
        );
        assert_eq!(
            normalize_slot_times("1:30 PM", "03:00 pm").unwrap(),
            ("13:30".to_string(), "15:00".to_string())
        );
        assert_eq!(
            normalize_slot_times("", "  ").unwrap(),
            (String::new(), String::new())
        );
    }

    #[test]
    fn test_normalize_slot_times_rejects_bad_ranges() {
        assert!(normalize_slot_times("10:00", "08:00").is_err());
        assert!(normalize_slot_times("10:00", "10:00").is_err());
        assert!(normalize_slot_times("10:00", "").is_err());
        assert!(normalize_slot_times("noon", "13:00").is_err());
    }

    #[test]
    fn test_format_expected_time() {
        assert_eq!(format_expected_time("08:00", "10:00"), "8:00 AM - 10:00 AM");
        assert_eq!(format_expected_time("12:30", "13:05"), "12:30 PM - 1:05 PM");
        assert_eq!(format_expected_time("", ""), "");
    }
}
