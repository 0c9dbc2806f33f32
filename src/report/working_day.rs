use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::model::holiday::Holiday;

/// Whether a weekday counts toward the working-day total, and by how much.
/// `1.0` for a plain weekday, `0.5` under a half-day holiday, `0.0` when a
/// full-day holiday excludes it entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayDecision {
    pub date: NaiveDate,
    pub weight: f64,
}

impl DayDecision {
    /// Days with zero weight do not count toward possible attendance.
    pub fn counts(&self) -> bool {
        self.weight > 0.0
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Per-weekday inclusion decisions for `[start, end]` inclusive.
///
/// Weekends are skipped outright; holidays outside the range are ignored.
/// `start > end` yields an empty list rather than an error, so off-by-one
/// queries from the UI degrade to zeroed reports.
pub fn day_decisions(start: NaiveDate, end: NaiveDate, holidays: &[Holiday]) -> Vec<DayDecision> {
    let half_day_by_date: HashMap<NaiveDate, bool> =
        holidays.iter().map(|h| (h.date, h.is_half_day)).collect();

    let mut decisions = Vec::new();
    let mut day = start;
    while day <= end {
        if !is_weekend(day) {
            let weight = match half_day_by_date.get(&day) {
                Some(true) => 0.5,
                Some(false) => 0.0,
                None => 1.0,
            };
            decisions.push(DayDecision { date: day, weight });
        }
        day = match day.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    decisions
}

/// Working days in `[start, end]` inclusive: Monday through Friday, minus
/// holiday deductions. Fractional totals come from half-day holidays.
pub fn working_days(start: NaiveDate, end: NaiveDate, holidays: &[Holiday]) -> f64 {
    day_decisions(start, end, holidays)
        .iter()
        .map(|d| d.weight)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn holiday(y: i32, m: u32, d: u32, half: bool) -> Holiday {
        Holiday {
            id: 0,
            date: date(y, m, d),
            name: "test".into(),
            is_half_day: half,
        }
    }

    #[test]
    fn plain_work_week_counts_five() {
        // 2024-04-01 is a Monday.
        assert_eq!(working_days(date(2024, 4, 1), date(2024, 4, 5), &[]), 5.0);
    }

    #[test]
    fn full_day_holiday_removes_one() {
        let holidays = [holiday(2024, 4, 3, false)];
        assert_eq!(
            working_days(date(2024, 4, 1), date(2024, 4, 5), &holidays),
            4.0
        );
    }

    #[test]
    fn half_day_holiday_removes_half() {
        let holidays = [holiday(2024, 4, 3, true)];
        assert_eq!(
            working_days(date(2024, 4, 1), date(2024, 4, 5), &holidays),
            4.5
        );
    }

    #[test]
    fn weekend_holiday_changes_nothing() {
        // 2024-04-06 is a Saturday, already excluded.
        let holidays = [holiday(2024, 4, 6, false)];
        assert_eq!(
            working_days(date(2024, 4, 1), date(2024, 4, 7), &holidays),
            5.0
        );
    }

    #[test]
    fn holiday_outside_range_is_ignored() {
        let holidays = [holiday(2024, 5, 1, false)];
        assert_eq!(
            working_days(date(2024, 4, 1), date(2024, 4, 5), &holidays),
            5.0
        );
    }

    #[test]
    fn single_weekday_is_one_weekend_zero() {
        assert_eq!(working_days(date(2024, 4, 1), date(2024, 4, 1), &[]), 1.0);
        assert_eq!(working_days(date(2024, 4, 6), date(2024, 4, 6), &[]), 0.0);
    }

    #[test]
    fn inverted_range_is_zero() {
        assert_eq!(working_days(date(2024, 4, 5), date(2024, 4, 1), &[]), 0.0);
        assert!(day_decisions(date(2024, 4, 5), date(2024, 4, 1), &[]).is_empty());
    }

    #[test]
    fn fully_excluded_day_still_appears_in_decisions() {
        let holidays = [holiday(2024, 4, 3, false)];
        let decisions = day_decisions(date(2024, 4, 1), date(2024, 4, 5), &holidays);
        assert_eq!(decisions.len(), 5);
        let excluded = decisions.iter().find(|d| d.date == date(2024, 4, 3)).unwrap();
        assert!(!excluded.counts());
    }
}
