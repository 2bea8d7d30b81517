//! Timestamp helpers.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current time as an ISO-8601 UTC string, the format every event
/// timestamp uses.
pub fn now_iso8601() -> String {
    format_iso8601(&Utc::now())
}

/// Format a DateTime as ISO-8601 UTC with millisecond precision.
pub fn format_iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 string back into UTC.
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_parse_round_trip() {
        let dt = Utc.with_ymd_and_hms(2021, 6, 1, 12, 30, 45).unwrap();
        let formatted = format_iso8601(&dt);
        assert_eq!(formatted, "2021-06-01T12:30:45.000Z");
        assert_eq!(parse_iso8601(&formatted).unwrap(), dt);
    }

    #[test]
    fn timestamps_order_lexicographically() {
        let early = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 1).unwrap();
        assert!(format_iso8601(&early) < format_iso8601(&late));
    }
}
