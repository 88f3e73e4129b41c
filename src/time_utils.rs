// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time formatted for `created_at`/`updated_at`.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_ride_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Parse a local clock time, accepting `HH:MM` (form input) or `HH:MM:SS`.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_uses_z_suffix() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 7, 30, 0).unwrap();
        assert_eq!(format_utc_rfc3339(ts), "2024-06-01T07:30:00Z");
    }

    #[test]
    fn test_parse_clock_time_formats() {
        assert_eq!(
            parse_clock_time("07:30"),
            NaiveTime::from_hms_opt(7, 30, 0)
        );
        assert_eq!(
            parse_clock_time("18:05:10"),
            NaiveTime::from_hms_opt(18, 5, 10)
        );
        assert!(parse_clock_time("7.30am").is_none());
        assert!(parse_ride_date("2024-02-30").is_none());
    }
}
