use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

/// Local calendar day of a stored UTC instant.
///
/// All date bucketing in the engine goes through here; comparing a raw UTC
/// timestamp against a local day boundary is always wrong.
pub fn to_local_date(instant: DateTime<Utc>, zone: FixedOffset) -> NaiveDate {
    instant.with_timezone(&zone).date_naive()
}

/// Local wall-clock time of a stored UTC instant.
pub fn to_local_time(instant: DateTime<Utc>, zone: FixedOffset) -> NaiveTime {
    instant.with_timezone(&zone).time()
}

/// `YYYY-MM-DD` rendering of the local calendar day.
pub fn to_local_date_string(instant: DateTime<Utc>, zone: FixedOffset) -> String {
    to_local_date(instant, zone).format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jakarta() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    #[test]
    fn utc_evening_is_next_local_day() {
        // 18:30 UTC is 01:30 the next day in UTC+7.
        let instant = Utc.with_ymd_and_hms(2024, 4, 1, 18, 30, 0).unwrap();
        assert_eq!(
            to_local_date(instant, jakarta()),
            NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
        );
        assert_eq!(to_local_date_string(instant, jakarta()), "2024-04-02");
    }

    #[test]
    fn local_time_applies_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 4, 1, 1, 5, 0).unwrap();
        assert_eq!(
            to_local_time(instant, jakarta()),
            NaiveTime::from_hms_opt(8, 5, 0).unwrap()
        );
    }

    #[test]
    fn midnight_boundary_stays_on_same_day() {
        let instant = Utc.with_ymd_and_hms(2024, 4, 1, 17, 0, 0).unwrap();
        assert_eq!(to_local_date_string(instant, jakarta()), "2024-04-02");
        let just_before = Utc.with_ymd_and_hms(2024, 4, 1, 16, 59, 59).unwrap();
        assert_eq!(to_local_date_string(just_before, jakarta()), "2024-04-01");
    }
}
