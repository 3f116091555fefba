//! Timestamp parsing and formatting helpers.
//!
//! Both backends emit ISO-8601 instants, but the mail store omits the UTC
//! offset on some records. Parsing is therefore lenient: an offset-free
//! timestamp is treated as UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parses an ISO-8601 timestamp, accepting values without a UTC offset.
pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            raw.parse::<NaiveDateTime>()
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

/// Formats a timestamp for list views, e.g. "Mar 5, 2025 14:30".
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y %H:%M").to_string()
}

/// Formats a timestamp as a short clock time for activity feeds.
pub fn format_time(dt: &DateTime<Utc>) -> String {
    dt.format("%H:%M").to_string()
}

/// Serde adapter using the lenient parser. Serializes as RFC 3339.
pub mod lenient {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_with_offset() {
        let dt = parse("2025-03-13T15:30:30.333915+00:00").unwrap();
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_with_zulu_suffix() {
        let dt = parse("2025-03-13T15:30:30Z").unwrap();
        assert_eq!(dt.hour(), 15);
    }

    #[test]
    fn test_parse_without_offset_assumes_utc() {
        // The mail backend emits naive isoformat timestamps.
        let dt = parse("2025-03-13T15:30:30.333915").unwrap();
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.second(), 30);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("not a timestamp").is_err());
    }

    #[test]
    fn test_format_helpers() {
        let dt = parse("2025-03-05T09:07:00Z").unwrap();
        assert_eq!(format_date(&dt), "Mar 5, 2025 09:07");
        assert_eq!(format_time(&dt), "09:07");
    }
}
