//! Wall-clock derivation shared by the logger and the aggregation views.
//!
//! Local time is always `UTC epoch + the API-reported offset`, rendered as a
//! naive datetime with no timezone marker. The string form is the dataset's
//! `local_time` column and must stay byte-compatible with existing rows.

use chrono::{DateTime, NaiveDateTime};

/// Format of the `local_time` dataset column.
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// City-local wall clock for a UTC epoch timestamp and an offset in seconds.
///
/// Returns `None` when `epoch + offset` falls outside the representable
/// datetime range.
pub fn local_datetime(epoch: i64, offset_secs: i64) -> Option<NaiveDateTime> {
    let shifted = epoch.checked_add(offset_secs)?;
    DateTime::from_timestamp(shifted, 0).map(|dt| dt.naive_utc())
}

/// `YYYY-MM-DD HH:MM:SS` rendition of [`local_datetime`].
pub fn local_time_string(epoch: i64, offset_secs: i64) -> Option<String> {
    local_datetime(epoch, offset_secs).map(|dt| dt.format(LOCAL_TIME_FORMAT).to_string())
}

/// Parse a `local_time` column value back into a naive datetime.
pub fn parse_local_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, LOCAL_TIME_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_offset_shifts_the_calendar_representation() {
        // 1700000000 is 2023-11-14 22:13:20 UTC.
        assert_eq!(
            local_time_string(1_700_000_000, 3_600).as_deref(),
            Some("2023-11-14 23:13:20")
        );
    }

    #[test]
    fn negative_offset_can_cross_midnight() {
        // 2023-11-15 00:13:20 UTC minus five hours lands on the previous day.
        assert_eq!(
            local_time_string(1_700_007_200, -18_000).as_deref(),
            Some("2023-11-14 19:13:20")
        );
    }

    #[test]
    fn zero_offset_is_the_utc_representation() {
        assert_eq!(
            local_time_string(1_700_000_000, 0).as_deref(),
            Some("2023-11-14 22:13:20")
        );
    }

    #[test]
    fn string_form_round_trips_through_parse() {
        let s = local_time_string(1_700_000_000, 7_200).expect("valid");
        let parsed = parse_local_time(&s).expect("parses back");
        assert_eq!(parsed, local_datetime(1_700_000_000, 7_200).expect("valid"));
    }

    #[test]
    fn overflowing_offset_is_rejected() {
        assert!(local_datetime(i64::MAX, 1).is_none());
    }
}
