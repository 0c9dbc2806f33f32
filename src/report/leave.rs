use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveRequest, LeaveStatus};

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct LeaveStatusCounts {
    pub approved: u32,
    pub rejected: u32,
    pub pending: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveBalance {
    pub quota: f64,
    pub used: f64,
    /// `max(0, quota - used)`; quotas do not roll over between months.
    pub remaining: f64,
}

/// Inclusive interval overlap between a request and `[start, end]`.
pub fn overlaps(request: &LeaveRequest, start: NaiveDate, end: NaiveDate) -> bool {
    request.start_date <= end && request.end_date >= start
}

/// Inclusive day count of a request span; a single-day request counts 1.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(0)
}

/// First and last calendar day of a month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first.pred_opt()?))
}

/// Status partition over the requests that overlap `[start, end]`.
pub fn status_counts(requests: &[LeaveRequest], start: NaiveDate, end: NaiveDate) -> LeaveStatusCounts {
    let mut counts = LeaveStatusCounts::default();
    for request in requests.iter().filter(|r| overlaps(r, start, end)) {
        if request.status == LeaveStatus::Approved.to_string() {
            counts.approved += 1;
        } else if request.status == LeaveStatus::Rejected.to_string() {
            counts.rejected += 1;
        } else if request.status == LeaveStatus::Pending.to_string() {
            counts.pending += 1;
        }
    }
    counts
}

/// Days of approved leave counted against a user's month.
///
/// Each approved request overlapping the month contributes its full
/// inclusive span. A request spanning a month boundary therefore counts its
/// whole length in every month it touches; that mirrors the established
/// quota policy and changing it needs a stakeholder decision, not a code
/// one.
pub fn used_leave_days(requests: &[LeaveRequest], user_id: u64, year: i32, month: u32) -> f64 {
    let Some((first, last)) = month_bounds(year, month) else {
        return 0.0;
    };
    requests
        .iter()
        .filter(|r| r.user_id == user_id && r.is_approved() && overlaps(r, first, last))
        .map(|r| inclusive_days(r.start_date, r.end_date) as f64)
        .sum()
}

/// Total approved leave days landing in a month, across all users.
pub fn total_leave_days(requests: &[LeaveRequest], year: i32, month: u32) -> f64 {
    let Some((first, last)) = month_bounds(year, month) else {
        return 0.0;
    };
    requests
        .iter()
        .filter(|r| r.is_approved() && overlaps(r, first, last))
        .map(|r| inclusive_days(r.start_date, r.end_date) as f64)
        .sum()
}

/// Count of users on approved leave on one calendar day.
pub fn approved_on_day(requests: &[LeaveRequest], day: NaiveDate) -> u32 {
    requests
        .iter()
        .filter(|r| r.is_approved() && overlaps(r, day, day))
        .count() as u32
}

pub fn balance(quota: f64, used: f64) -> LeaveBalance {
    LeaveBalance {
        quota,
        used,
        remaining: (quota - used).max(0.0),
    }
}

/// Months are 1-based; out-of-range input falls back to January's name.
pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    NAMES[(month.clamp(1, 12) - 1) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(user_id: u64, start: NaiveDate, end: NaiveDate, status: &str) -> LeaveRequest {
        LeaveRequest {
            id: 0,
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

    #[test]
    fn overlap_is_inclusive_on_both_ends() {
        let r = request(1, date(2024, 4, 10), date(2024, 4, 12), "approved");
        assert!(overlaps(&r, date(2024, 4, 12), date(2024, 4, 20)));
        assert!(overlaps(&r, date(2024, 4, 1), date(2024, 4, 10)));
        assert!(!overlaps(&r, date(2024, 4, 13), date(2024, 4, 20)));
    }

    #[test]
    fn single_day_request_uses_one_day() {
        let requests = [request(1, date(2024, 4, 10), date(2024, 4, 10), "approved")];
        assert_eq!(used_leave_days(&requests, 1, 2024, 4), 1.0);
    }

    #[test]
    fn three_day_request_exhausts_default_quota() {
        let requests = [request(1, date(2024, 4, 10), date(2024, 4, 12), "approved")];
        let used = used_leave_days(&requests, 1, 2024, 4);
        assert_eq!(used, 3.0);
        let b = balance(2.0, used);
        assert_eq!(b.remaining, 0.0);
    }

    #[test]
    fn no_requests_leaves_full_quota() {
        let b = balance(2.0, used_leave_days(&[], 1, 2024, 4));
        assert_eq!(b.used, 0.0);
        assert_eq!(b.remaining, 2.0);
    }

    #[test]
    fn pending_and_rejected_do_not_consume_quota() {
        let requests = [
            request(1, date(2024, 4, 1), date(2024, 4, 2), "pending"),
            request(1, date(2024, 4, 3), date(2024, 4, 4), "rejected"),
        ];
        assert_eq!(used_leave_days(&requests, 1, 2024, 4), 0.0);
    }

    #[test]
    fn cross_month_span_counts_fully_in_each_month() {
        let requests = [request(1, date(2024, 4, 29), date(2024, 5, 2), "approved")];
        assert_eq!(used_leave_days(&requests, 1, 2024, 4), 4.0);
        assert_eq!(used_leave_days(&requests, 1, 2024, 5), 4.0);
    }

    #[test]
    fn status_partition_only_sees_overlapping_requests() {
        let requests = [
            request(1, date(2024, 4, 1), date(2024, 4, 2), "approved"),
            request(2, date(2024, 4, 3), date(2024, 4, 4), "rejected"),
            request(3, date(2024, 5, 1), date(2024, 5, 2), "pending"),
        ];
        let counts = status_counts(&requests, date(2024, 4, 1), date(2024, 4, 30));
        assert_eq!(counts.approved, 1);
        assert_eq!(counts.rejected, 1);
        assert_eq!(counts.pending, 0);
    }

    #[test]
    fn month_bounds_handle_december() {
        assert_eq!(
            month_bounds(2024, 12),
            Some((date(2024, 12, 1), date(2024, 12, 31)))
        );
        assert_eq!(
            month_bounds(2024, 2),
            Some((date(2024, 2, 1), date(2024, 2, 29)))
        );
    }

    #[test]
    fn approved_on_day_counts_users() {
        let requests = [
            request(1, date(2024, 4, 10), date(2024, 4, 12), "approved"),
            request(2, date(2024, 4, 11), date(2024, 4, 11), "approved"),
            request(3, date(2024, 4, 11), date(2024, 4, 11), "pending"),
        ];
        assert_eq!(approved_on_day(&requests, date(2024, 4, 11)), 2);
        assert_eq!(approved_on_day(&requests, date(2024, 4, 13)), 0);
    }
}
