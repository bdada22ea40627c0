/// Wall-clock helpers. Timestamps are epoch milliseconds (as `Date.now()`
/// returns them) and are shown in the user's local zone on every target.
use chrono::{DateTime, Local, TimeZone, Utc};

/// Milliseconds since the Unix epoch
pub fn now_millis() -> f64 {
    Utc::now().timestamp_millis() as f64
}

/// `HH:MM:SS` for a timestamp
pub fn format_time(millis: f64) -> String {
    format_in(millis, &Local, "%H:%M:%S")
}

/// `YYYY-MM-DD HH:MM` for session listings
pub fn format_date(millis: f64) -> String {
    format_in(millis, &Local, "%Y-%m-%d %H:%M")
}

// Out-of-range timestamps format as an empty string
fn format_in<Tz>(millis: f64, zone: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    DateTime::from_timestamp_millis(millis as i64)
        .map(|utc| utc.with_timezone(zone).format(pattern).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_now_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000.0);
    }

    #[test]
    fn test_format_time_in_utc() {
        // 2023-10-28T16:30:00Z
        assert_eq!(format_in(1698510600000.0, &Utc, "%H:%M:%S"), "16:30:00");
        assert_eq!(format_in(0.0, &Utc, "%H:%M:%S"), "00:00:00");
    }

    #[test]
    fn test_format_date_in_utc() {
        assert_eq!(format_in(1698510600000.0, &Utc, "%Y-%m-%d %H:%M"), "2023-10-28 16:30");
        assert_eq!(format_in(951782400000.0, &Utc, "%Y-%m-%d %H:%M"), "2000-02-29 00:00");
    }

    #[test]
    fn test_format_follows_zone_offset() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

        assert_eq!(format_in(1698510600000.0, &tokyo, "%Y-%m-%d %H:%M"), "2023-10-29 01:30");
    }

    #[test]
    fn test_local_formatting_matches_chrono_local() {
        let millis = 1698510600000.0;
        let expected = Local.timestamp_millis_opt(1698510600000).unwrap();

        assert_eq!(format_time(millis), expected.format("%H:%M:%S").to_string());
        assert_eq!(format_date(millis), expected.format("%Y-%m-%d %H:%M").to_string());
    }

    #[test]
    fn test_out_of_range_is_empty() {
        assert_eq!(format_time(f64::MAX), "");
    }
}
