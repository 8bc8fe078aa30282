//! Display time zone conversion
//!
//! Timestamps are stored in UTC. They are shown to users in a single fixed
//! zone, US Pacific, and the conversion happens when a database row becomes a
//! response record.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;

/// Zone every user-facing timestamp is rendered in
pub const DISPLAY_TIME_ZONE: Tz = chrono_tz::America::Los_Angeles;

/// Convert a stored UTC timestamp to the display zone
pub fn to_local(timestamp: DateTime<Utc>) -> DateTime<FixedOffset> {
    timestamp.with_timezone(&DISPLAY_TIME_ZONE).fixed_offset()
}

/// Calendar date of a stored UTC timestamp in the display zone
pub fn to_local_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&DISPLAY_TIME_ZONE).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_rolls_back_across_midnight() {
        // 05:00 UTC is 21:00 the previous evening in PST
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 5, 0, 0).unwrap();
        assert_eq!(
            to_local_date(ts),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_local_date_same_day() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 20, 0, 0).unwrap();
        assert_eq!(
            to_local_date(ts),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_local_offset_follows_daylight_saving() {
        let winter = to_local(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
        assert_eq!(winter.offset().local_minus_utc(), -8 * 3600);

        let summer = to_local(Utc.with_ymd_and_hms(2024, 7, 1, 6, 0, 0).unwrap());
        assert_eq!(summer.offset().local_minus_utc(), -7 * 3600);
        assert_eq!(summer.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }

    #[test]
    fn test_conversion_preserves_instant() {
        let ts = Utc.with_ymd_and_hms(2023, 3, 12, 10, 30, 0).unwrap();
        assert_eq!(to_local(ts).with_timezone(&Utc), ts);
    }
}
