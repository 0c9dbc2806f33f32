use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::model::attendance::AttendanceRecord;
use crate::model::holiday::Holiday;
use crate::model::leave_request::LeaveRequest;

/// Data-access seam for the report assembler. The SQL implementation is the
/// production one; tests use an in-memory implementation.
pub trait ReportSource {
    async fn list_attendance(&self, start: NaiveDate, end: NaiveDate)
    -> Result<Vec<AttendanceRecord>>;

    /// Requests whose inclusive span overlaps `[start, end]`.
    async fn list_leave_requests(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveRequest>>;

    async fn list_holidays(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>>;

    async fn count_active_employees(&self) -> Result<u32>;

    /// Explicit quota row for a user's month, if an admin has set one.
    async fn leave_quota(&self, user_id: u64, year: i32, month: u32) -> Result<Option<f64>>;
}

/// MySQL-backed source. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct SqlReportSource {
    pool: MySqlPool,
}

impl SqlReportSource {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl ReportSource for SqlReportSource {
    async fn list_attendance(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, user_id, date, check_in, check_out, status, note
            FROM attendance
            WHERE date BETWEEN ? AND ?
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch attendance records")
    }

    async fn list_leave_requests(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<LeaveRequest>> {
        sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT id, user_id, start_date, end_date, leave_type, status, reason, approved_by, created_at
            FROM leave_requests
            WHERE start_date <= ? AND end_date >= ?
            "#,
        )
        .bind(end)
        .bind(start)
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch leave requests")
    }

    async fn list_holidays(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>> {
        sqlx::query_as::<_, Holiday>(
            r#"
            SELECT id, date, name, is_half_day
            FROM holidays
            WHERE date BETWEEN ? AND ?
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch holidays")
    }

    async fn count_active_employees(&self) -> Result<u32> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE is_active = 1 AND role_id = 2",
        )
        .fetch_one(&self.pool)
        .await
        .context("failed to count active employees")?;
        Ok(count.max(0) as u32)
    }

    async fn leave_quota(&self, user_id: u64, year: i32, month: u32) -> Result<Option<f64>> {
        sqlx::query_scalar::<_, f64>(
            r#"
            SELECT quota FROM leave_quotas
            WHERE user_id = ? AND year = ? AND month = ?
            "#,
        )
        .bind(user_id)
        .bind(year)
        .bind(month)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch leave quota")
    }
}
