use std::collections::HashMap;

use anyhow::Result;
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;

use crate::report::leave::{self, LeaveBalance};
use crate::report::source::ReportSource;
use crate::report::working_day::{self, DayDecision};
use crate::report::{attendance, timezone};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SummaryReport {
    pub total_working_days: f64,
    pub average_attendance_percent: f64,
    pub total_late_count: u64,
    pub leaves_approved: u32,
    pub leaves_rejected: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyReportEntry {
    #[schema(example = "2024-04-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    /// Users on approved leave that day.
    pub leave_count: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyReportEntry {
    #[schema(example = "April")]
    pub month: String,
    pub working_days: f64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub leave_days: f64,
    pub attendance_percent: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LateEmployeeEntry {
    pub user_id: u64,
    pub late_count: u32,
}

fn late_days_by_user(
    records: &[crate::model::attendance::AttendanceRecord],
    decisions: &[DayDecision],
    late_cutoff: NaiveTime,
    zone: FixedOffset,
) -> HashMap<u64, u32> {
    let counted: std::collections::HashSet<NaiveDate> = decisions
        .iter()
        .filter(|d| d.counts())
        .map(|d| d.date)
        .collect();

    let mut late_by_user: HashMap<u64, u32> = HashMap::new();
    for record in records {
        let Some(check_in) = record.check_in else {
            continue;
        };
        let day = timezone::to_local_date(check_in, zone);
        if counted.contains(&day) && timezone::to_local_time(check_in, zone) > late_cutoff {
            *late_by_user.entry(record.user_id).or_default() += 1;
        }
    }
    late_by_user
}

/// Range summary: working days, average attendance, late total and the
/// approved/rejected partition of overlapping leave requests.
pub async fn summary_report<S: ReportSource>(
    source: &S,
    start: NaiveDate,
    end: NaiveDate,
    late_cutoff: NaiveTime,
    zone: FixedOffset,
) -> Result<SummaryReport> {
    let holidays = source.list_holidays(start, end).await?;
    let records = source.list_attendance(start, end).await?;
    let leaves = source.list_leave_requests(start, end).await?;
    let total_active = source.count_active_employees().await?;

    let decisions = working_day::day_decisions(start, end, &holidays);
    let total_working_days: f64 = decisions.iter().map(|d| d.weight).sum();
    let daily = attendance::daily_breakdown(&records, &decisions, total_active, late_cutoff, zone);
    let totals = attendance::range_totals(&daily, total_working_days, total_active);
    let leave_counts = leave::status_counts(&leaves, start, end);

    Ok(SummaryReport {
        total_working_days,
        average_attendance_percent: totals.attendance_rate,
        total_late_count: totals.late,
        leaves_approved: leave_counts.approved,
        leaves_rejected: leave_counts.rejected,
    })
}

/// Per-working-day breakdown, most recent day first, truncated to `limit`.
pub async fn daily_report<S: ReportSource>(
    source: &S,
    start: NaiveDate,
    end: NaiveDate,
    limit: usize,
    late_cutoff: NaiveTime,
    zone: FixedOffset,
) -> Result<Vec<DailyReportEntry>> {
    let holidays = source.list_holidays(start, end).await?;
    let records = source.list_attendance(start, end).await?;
    let leaves = source.list_leave_requests(start, end).await?;
    let total_active = source.count_active_employees().await?;

    let decisions = working_day::day_decisions(start, end, &holidays);
    let daily = attendance::daily_breakdown(&records, &decisions, total_active, late_cutoff, zone);

    let mut entries: Vec<DailyReportEntry> = daily
        .iter()
        .map(|d| DailyReportEntry {
            date: d.date,
            present: d.present,
            late: d.late,
            absent: d.absent,
            leave_count: leave::approved_on_day(&leaves, d.date),
        })
        .collect();
    entries.reverse();
    entries.truncate(limit);
    Ok(entries)
}

/// Twelve entries for a calendar year.
pub async fn monthly_report<S: ReportSource>(
    source: &S,
    year: i32,
    late_cutoff: NaiveTime,
    zone: FixedOffset,
) -> Result<Vec<MonthlyReportEntry>> {
    let Some((year_start, _)) = leave::month_bounds(year, 1) else {
        return Ok(Vec::new());
    };
    let Some((_, year_end)) = leave::month_bounds(year, 12) else {
        return Ok(Vec::new());
    };

    let holidays = source.list_holidays(year_start, year_end).await?;
    let records = source.list_attendance(year_start, year_end).await?;
    let leaves = source.list_leave_requests(year_start, year_end).await?;
    let total_active = source.count_active_employees().await?;

    let mut entries = Vec::with_capacity(12);
    for month in 1..=12u32 {
        let Some((first, last)) = leave::month_bounds(year, month) else {
            continue;
        };
        let decisions = working_day::day_decisions(first, last, &holidays);
        let working_days: f64 = decisions.iter().map(|d| d.weight).sum();
        let daily =
            attendance::daily_breakdown(&records, &decisions, total_active, late_cutoff, zone);
        let totals = attendance::range_totals(&daily, working_days, total_active);

        entries.push(MonthlyReportEntry {
            month: leave::month_name(month).to_string(),
            working_days,
            present: totals.present,
            absent: totals.absent,
            late: totals.late,
            leave_days: leave::total_leave_days(&leaves, year, month),
            attendance_percent: totals.attendance_rate,
        });
    }
    Ok(entries)
}

/// Users ranked by late arrivals within the range, descending. Ties break
/// on user id ascending so the ranking is deterministic.
pub async fn top_late_employees<S: ReportSource>(
    source: &S,
    start: NaiveDate,
    end: NaiveDate,
    limit: usize,
    late_cutoff: NaiveTime,
    zone: FixedOffset,
) -> Result<Vec<LateEmployeeEntry>> {
    let holidays = source.list_holidays(start, end).await?;
    let records = source.list_attendance(start, end).await?;

    let decisions = working_day::day_decisions(start, end, &holidays);
    let late_by_user = late_days_by_user(&records, &decisions, late_cutoff, zone);

    let mut ranking: Vec<LateEmployeeEntry> = late_by_user
        .into_iter()
        .map(|(user_id, late_count)| LateEmployeeEntry { user_id, late_count })
        .collect();
    ranking.sort_by(|a, b| {
        b.late_count
            .cmp(&a.late_count)
            .then(a.user_id.cmp(&b.user_id))
    });
    ranking.truncate(limit);
    Ok(ranking)
}

/// Quota, used days, and remaining leave for one user's month. Falls back
/// to `default_quota` when no explicit quota row exists.
pub async fn leave_balance<S: ReportSource>(
    source: &S,
    user_id: u64,
    year: i32,
    month: u32,
    default_quota: f64,
) -> Result<LeaveBalance> {
    let Some((first, last)) = leave::month_bounds(year, month) else {
        return Ok(leave::balance(default_quota, 0.0));
    };
    let leaves = source.list_leave_requests(first, last).await?;
    let quota = source
        .leave_quota(user_id, year, month)
        .await?
        .unwrap_or(default_quota);
    let used = leave::used_leave_days(&leaves, user_id, year, month);
    Ok(leave::balance(quota, used))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceRecord;
    use crate::model::holiday::Holiday;
    use crate::model::leave_request::LeaveRequest;
    use crate::report::leave::overlaps;
    use chrono::{DateTime, Utc};

    #[derive(Default)]
    struct MemorySource {
        attendance: Vec<AttendanceRecord>,
        leaves: Vec<LeaveRequest>,
        holidays: Vec<Holiday>,
        active_employees: u32,
        quotas: Vec<(u64, i32, u32, f64)>,
    }

    impl ReportSource for MemorySource {
        async fn list_attendance(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<AttendanceRecord>> {
            Ok(self
                .attendance
                .iter()
                .filter(|r| r.date >= start && r.date <= end)
                .cloned()
                .collect())
        }

        async fn list_leave_requests(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<LeaveRequest>> {
            Ok(self
                .leaves
                .iter()
                .filter(|r| overlaps(r, start, end))
                .cloned()
                .collect())
        }

        async fn list_holidays(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>> {
            Ok(self
                .holidays
                .iter()
                .filter(|h| h.date >= start && h.date <= end)
                .cloned()
                .collect())
        }

        async fn count_active_employees(&self) -> Result<u32> {
            Ok(self.active_employees)
        }

        async fn leave_quota(&self, user_id: u64, year: i32, month: u32) -> Result<Option<f64>> {
            Ok(self
                .quotas
                .iter()
                .find(|(u, y, m, _)| *u == user_id && *y == year && *m == month)
                .map(|(_, _, _, q)| *q))
        }
    }

    fn zone() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    fn cutoff() -> NaiveTime {
        NaiveTime::from_hms_opt(8, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

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

    fn leave_req(id: u64, user_id: u64, start: NaiveDate, end: NaiveDate, status: &str) -> LeaveRequest {
        LeaveRequest {
            id,
            user_id,
            start_date: start,
            end_date: end,
            leave_type: "annual".into(),
            status: status.into(),
            reason: None,
            approved_by: None,
            created_at: None,
        }
    }

    fn april_source() -> MemorySource {
        MemorySource {
            attendance: vec![
                checkin_at(1, 1, date(2024, 4, 1), 7, 50),
                checkin_at(2, 2, date(2024, 4, 1), 8, 20),
                checkin_at(3, 1, date(2024, 4, 2), 8, 30),
                checkin_at(4, 2, date(2024, 4, 2), 7, 45),
                checkin_at(5, 1, date(2024, 4, 4), 8, 10),
            ],
            leaves: vec![
                leave_req(1, 3, date(2024, 4, 2), date(2024, 4, 3), "approved"),
                leave_req(2, 2, date(2024, 4, 8), date(2024, 4, 8), "rejected"),
                leave_req(3, 1, date(2024, 4, 15), date(2024, 4, 15), "pending"),
            ],
            holidays: vec![Holiday {
                id: 1,
                date: date(2024, 4, 3),
                name: "off".into(),
                is_half_day: false,
            }],
            active_employees: 3,
            quotas: vec![(2, 2024, 4, 4.0)],
        }
    }

    #[actix_web::test]
    async fn summary_composes_all_aggregates() {
        let source = april_source();
        let report = summary_report(&source, date(2024, 4, 1), date(2024, 4, 5), cutoff(), zone())
            .await
            .unwrap();

        // Mon-Fri minus one full-day holiday.
        assert_eq!(report.total_working_days, 4.0);
        assert_eq!(report.total_late_count, 3);
        assert_eq!(report.leaves_approved, 1);
        assert_eq!(report.leaves_rejected, 0);
        // 5 present slots over 4 days * 3 employees.
        assert!((report.average_attendance_percent - 5.0 / 12.0 * 100.0).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn daily_is_most_recent_first_and_limited() {
        let source = april_source();
        let entries = daily_report(&source, date(2024, 4, 1), date(2024, 4, 5), 2, cutoff(), zone())
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, date(2024, 4, 5));
        assert_eq!(entries[1].date, date(2024, 4, 4));
        assert_eq!(entries[1].present, 1);
        assert_eq!(entries[1].late, 1);
        assert_eq!(entries[1].absent, 2);
    }

    #[actix_web::test]
    async fn daily_reports_leave_counts_per_day() {
        let source = april_source();
        let entries = daily_report(&source, date(2024, 4, 1), date(2024, 4, 5), 10, cutoff(), zone())
            .await
            .unwrap();

        // 2024-04-02 has user 3 on approved leave; the holiday on the 3rd
        // is excluded from the list entirely.
        assert_eq!(entries.len(), 4);
        let tue = entries.iter().find(|e| e.date == date(2024, 4, 2)).unwrap();
        assert_eq!(tue.leave_count, 1);
        assert!(entries.iter().all(|e| e.date != date(2024, 4, 3)));
    }

    #[actix_web::test]
    async fn monthly_has_twelve_named_entries() {
        let source = april_source();
        let entries = monthly_report(&source, 2024, cutoff(), zone()).await.unwrap();

        assert_eq!(entries.len(), 12);
        assert_eq!(entries[0].month, "January");
        assert_eq!(entries[3].month, "April");
        // April 2024: 22 weekdays minus the full-day holiday.
        assert_eq!(entries[3].working_days, 21.0);
        assert_eq!(entries[3].present, 5);
        assert_eq!(entries[3].leave_days, 2.0);
        assert_eq!(entries[0].present, 0);
        assert_eq!(entries[0].attendance_percent, 0.0);
    }

    #[actix_web::test]
    async fn top_late_ranks_descending_with_stable_ties() {
        let mut source = april_source();
        // User 2 now matches user 1's two late days; tie breaks on id.
        source
            .attendance
            .push(checkin_at(6, 2, date(2024, 4, 5), 9, 0));
        let ranking =
            top_late_employees(&source, date(2024, 4, 1), date(2024, 4, 5), 10, cutoff(), zone())
                .await
                .unwrap();

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].user_id, 1);
        assert_eq!(ranking[0].late_count, 2);
        assert_eq!(ranking[1].user_id, 2);
        assert_eq!(ranking[1].late_count, 2);
    }

    #[actix_web::test]
    async fn leave_balance_uses_quota_row_then_default() {
        let source = april_source();
        // User 3 has an approved 2-day request and no quota row.
        let b = leave_balance(&source, 3, 2024, 4, 2.0).await.unwrap();
        assert_eq!((b.quota, b.used, b.remaining), (2.0, 2.0, 0.0));

        // User 2 has an explicit quota of 4 and only a rejected request.
        let b = leave_balance(&source, 2, 2024, 4, 2.0).await.unwrap();
        assert_eq!((b.quota, b.used, b.remaining), (4.0, 0.0, 4.0));
    }

    #[actix_web::test]
    async fn identical_inputs_yield_identical_output() {
        let source = april_source();
        let a = summary_report(&source, date(2024, 4, 1), date(2024, 4, 30), cutoff(), zone())
            .await
            .unwrap();
        let b = summary_report(&source, date(2024, 4, 1), date(2024, 4, 30), cutoff(), zone())
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[actix_web::test]
    async fn inverted_range_yields_zeroed_summary() {
        let source = april_source();
        let report = summary_report(&source, date(2024, 4, 5), date(2024, 4, 1), cutoff(), zone())
            .await
            .unwrap();
        assert_eq!(report.total_working_days, 0.0);
        assert_eq!(report.average_attendance_percent, 0.0);
        assert_eq!(report.total_late_count, 0);
    }
}
