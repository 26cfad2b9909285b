//! Kickoff time parsing for upstream event records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Resolve a kickoff instant in UTC.
///
/// Prefers the full `timestamp`; falls back to combining `date` and `time`.
/// Naive values are taken to be UTC already.
#[must_use]
pub fn parse_kickoff(
    timestamp: Option<&str>,
    date: Option<&str>,
    time: Option<&str>,
) -> Option<DateTime<Utc>> {
    timestamp
        .and_then(parse_timestamp)
        .or_else(|| combine_date_time(date?, time))
}

/// Parse an ISO-8601 timestamp with or without offset.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    // Drop a trailing offset we could not parse and read the local part as UTC.
    let local = s.split('+').next().unwrap_or(s).trim_end_matches('Z');
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Combine a `YYYY-MM-DD` date with an optional `HH:MM[:SS]` time in UTC.
/// A missing time means midnight.
#[must_use]
pub fn combine_date_time(date: &str, time: Option<&str>) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = time.map(str::trim).filter(|t| !t.is_empty());

    let time = match time {
        None => NaiveTime::MIN,
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(t.get(..5).unwrap_or(t), "%H:%M"))
            .ok()?,
    };

    Some(date.and_time(time).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn timestamp_with_zulu_suffix() {
        assert_eq!(
            parse_timestamp("2023-10-21T17:15:00Z"),
            Some(utc(2023, 10, 21, 17, 15))
        );
    }

    #[test]
    fn timestamp_with_offset_is_converted() {
        assert_eq!(
            parse_timestamp("2023-10-21T19:15:00+02:00"),
            Some(utc(2023, 10, 21, 17, 15))
        );
        assert_eq!(
            parse_timestamp("2023-10-21 19:15:00+02:00"),
            Some(utc(2023, 10, 21, 17, 15))
        );
    }

    #[test]
    fn naive_timestamp_is_utc() {
        assert_eq!(
            parse_timestamp("2023-10-21T17:15:00"),
            Some(utc(2023, 10, 21, 17, 15))
        );
        assert_eq!(
            parse_timestamp("2023-10-21 17:15:00"),
            Some(utc(2023, 10, 21, 17, 15))
        );
    }

    #[test]
    fn garbage_timestamp_is_none() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("next saturday"), None);
    }

    #[test]
    fn date_and_time_fallback() {
        assert_eq!(
            parse_kickoff(None, Some("2024-01-13"), Some("14:00:00")),
            Some(utc(2024, 1, 13, 14, 0))
        );
        assert_eq!(
            parse_kickoff(Some(""), Some("2024-01-13"), Some("14:00:00+00:00")),
            Some(utc(2024, 1, 13, 14, 0))
        );
    }

    #[test]
    fn missing_time_is_midnight() {
        assert_eq!(
            parse_kickoff(None, Some("2024-01-13"), None),
            Some(utc(2024, 1, 13, 0, 0))
        );
    }

    #[test]
    fn timestamp_wins_over_date() {
        assert_eq!(
            parse_kickoff(
                Some("2024-01-13T19:35:00"),
                Some("2024-01-14"),
                Some("12:00:00")
            ),
            Some(utc(2024, 1, 13, 19, 35))
        );
    }

    #[test]
    fn nothing_to_parse() {
        assert_eq!(parse_kickoff(None, None, Some("12:00:00")), None);
        assert_eq!(parse_kickoff(None, Some("soon"), None), None);
    }
}
