use std::collections::{HashMap, HashSet};

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::AttendanceRecord;
use crate::report::timezone;
use crate::report::working_day::DayDecision;

/// Present / late / absent counts for one working day.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyAttendance {
    #[schema(example = "2024-04-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub present: u32,
    pub late: u32,
    pub absent: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceTotals {
    pub present: u64,
    pub late: u64,
    pub absent: u64,
    /// Percentage in [0, 100]; 0 when there are no working days or no
    /// active employees.
    pub attendance_rate: f64,
}

/// Distinct users with a check-in per local day, split into on-time and
/// late against `late_cutoff` (strictly after the cutoff is late).
///
/// Duplicate rows for the same user and day count once; presence is a
/// distinct-user aggregation, and a user is late if any of their check-ins
/// that day lands past the cutoff.
pub fn daily_breakdown(
    records: &[AttendanceRecord],
    decisions: &[DayDecision],
    total_active: u32,
    late_cutoff: NaiveTime,
    zone: FixedOffset,
) -> Vec<DailyAttendance> {
    let mut present_by_day: HashMap<NaiveDate, HashSet<u64>> = HashMap::new();
    let mut late_by_day: HashMap<NaiveDate, HashSet<u64>> = HashMap::new();

    for record in records {
        let Some(check_in) = record.check_in else {
            continue;
        };
        let day = timezone::to_local_date(check_in, zone);
        present_by_day.entry(day).or_default().insert(record.user_id);
        if timezone::to_local_time(check_in, zone) > late_cutoff {
            late_by_day.entry(day).or_default().insert(record.user_id);
        }
    }

    decisions
        .iter()
        .filter(|d| d.counts())
        .map(|d| {
            let present = present_by_day.get(&d.date).map_or(0, |s| s.len()) as u32;
            let late = late_by_day.get(&d.date).map_or(0, |s| s.len()) as u32;
            DailyAttendance {
                date: d.date,
                present,
                late,
                absent: total_active.saturating_sub(present),
            }
        })
        .collect()
}

/// Range totals over a daily breakdown. The attendance rate is
/// `present / (working_days * total_active) * 100`, 0 when the denominator
/// is 0 so empty companies and empty ranges never divide by zero.
pub fn range_totals(
    daily: &[DailyAttendance],
    working_days: f64,
    total_active: u32,
) -> AttendanceTotals {
    let present: u64 = daily.iter().map(|d| u64::from(d.present)).sum();
    let late: u64 = daily.iter().map(|d| u64::from(d.late)).sum();
    let absent: u64 = daily.iter().map(|d| u64::from(d.absent)).sum();

    let denominator = working_days * f64::from(total_active);
    let attendance_rate = if denominator > 0.0 {
        (present as f64 / denominator * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    AttendanceTotals {
        present,
        late,
        absent,
        attendance_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::holiday::Holiday;
    use crate::report::working_day::day_decisions;
    use chrono::{DateTime, Utc};

    fn zone() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    fn cutoff() -> NaiveTime {
        NaiveTime::from_hms_opt(8, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Check-in at a local wall-clock hour/minute, stored as UTC.
    fn checkin_at(id: u64, user_id: u64, day: NaiveDate, h: u32, min: u32) -> AttendanceRecord {
        let local = day.and_hms_opt(h, min, 0).unwrap();
        let utc: DateTime<Utc> = (local - chrono::Duration::hours(7)).and_utc();
        AttendanceRecord {
            id,
            user_id,
            date: day,
            check_in: Some(utc),
            check_out: None,
            status: "present".into(),
            note: None,
        }
    }

    fn week_decisions() -> Vec<crate::report::working_day::DayDecision> {
        day_decisions(date(2024, 4, 1), date(2024, 4, 5), &[])
    }

    #[test]
    fn counts_present_late_and_absent() {
        let records = vec![
            checkin_at(1, 1, date(2024, 4, 1), 7, 55),
            checkin_at(2, 2, date(2024, 4, 1), 8, 10),
            checkin_at(3, 3, date(2024, 4, 2), 8, 0), // exactly on the cutoff: not late
        ];
        let daily = daily_breakdown(&records, &week_decisions(), 10, cutoff(), zone());
        assert_eq!(daily.len(), 5);
        assert_eq!((daily[0].present, daily[0].late, daily[0].absent), (2, 1, 8));
        assert_eq!((daily[1].present, daily[1].late, daily[1].absent), (1, 0, 9));
        assert_eq!((daily[2].present, daily[2].absent), (0, 10));
    }

    #[test]
    fn duplicate_rows_count_one_user() {
        let records = vec![
            checkin_at(1, 7, date(2024, 4, 1), 8, 30),
            checkin_at(2, 7, date(2024, 4, 1), 8, 45),
        ];
        let daily = daily_breakdown(&records, &week_decisions(), 5, cutoff(), zone());
        assert_eq!(daily[0].present, 1);
        assert_eq!(daily[0].late, 1);
    }

    #[test]
    fn absent_never_goes_negative() {
        let records = vec![
            checkin_at(1, 1, date(2024, 4, 1), 7, 0),
            checkin_at(2, 2, date(2024, 4, 1), 7, 0),
        ];
        let daily = daily_breakdown(&records, &week_decisions(), 1, cutoff(), zone());
        assert_eq!(daily[0].absent, 0);
    }

    #[test]
    fn excluded_holiday_day_gets_no_entry() {
        let holidays = [Holiday {
            id: 0,
            date: date(2024, 4, 3),
            name: "off".into(),
            is_half_day: false,
        }];
        let decisions = day_decisions(date(2024, 4, 1), date(2024, 4, 5), &holidays);
        let daily = daily_breakdown(&[], &decisions, 3, cutoff(), zone());
        assert_eq!(daily.len(), 4);
        assert!(daily.iter().all(|d| d.date != date(2024, 4, 3)));
    }

    #[test]
    fn rate_is_zero_guarded_and_bounded() {
        let totals = range_totals(&[], 0.0, 0);
        assert_eq!(totals.attendance_rate, 0.0);

        let records: Vec<_> = (1..=10)
            .map(|u| checkin_at(u, u, date(2024, 4, 1), 7, 30))
            .collect();
        let daily = daily_breakdown(&records, &week_decisions(), 10, cutoff(), zone());
        let totals = range_totals(&daily, 5.0, 10);
        assert_eq!(totals.present, 10);
        assert!((0.0..=100.0).contains(&totals.attendance_rate));
        assert!((totals.attendance_rate - 20.0).abs() < 1e-9);
    }
}
