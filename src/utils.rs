//! Utility functions shared by handlers and the storage layer

use chrono::{DateTime, Utc};

/// Layout of every stored `createdAt`/`updatedAt` value and of the error
/// envelope `date` field.
pub const DATABASE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a DateTime the way timestamps are persisted.
///
/// Example output: "2023-01-10 14:03:54"
pub fn format_database_datetime(dt: DateTime<Utc>) -> String {
    dt.format(DATABASE_DATETIME_FORMAT).to_string()
}

/// Gets the current time formatted for persistence
pub fn current_database_datetime() -> String {
    format_database_datetime(Utc::now())
}

/// Parses a numeric record id from a path segment.
///
/// Anything that is not a positive integer yields `None`, which handlers
/// treat the same as a missing record.
pub fn parse_record_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_database_datetime() {
        let dt = Utc.with_ymd_and_hms(2023, 1, 10, 8, 5, 3).unwrap();
        assert_eq!(format_database_datetime(dt), "2023-01-10 08:05:03");
    }

    #[test]
    fn test_current_database_datetime_shape() {
        let now = current_database_datetime();
        assert_eq!(now.len(), 19);
        assert!(chrono::NaiveDateTime::parse_from_str(&now, DATABASE_DATETIME_FORMAT).is_ok());
    }

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id("42"), Some(42));
        assert_eq!(parse_record_id(" 7 "), Some(7));
        assert_eq!(parse_record_id("0"), None);
        assert_eq!(parse_record_id("-3"), None);
        assert_eq!(parse_record_id("abc"), None);
        assert_eq!(parse_record_id(""), None);
    }
}
