use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Leave request spanning an inclusive local date range.
/// Status only ever moves pending -> approved or pending -> rejected.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: u64,
    pub user_id: u64,
    #[schema(example = "2024-04-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-04-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "annual", value_type = String)]
    pub leave_type: String,
    #[schema(example = "pending", value_type = String)]
    pub status: String,
    pub reason: Option<String>,
    /// Admin user who approved or rejected the request.
    pub approved_by: Option<u64>,
    #[schema(example = "2024-04-01T00:00:00Z", format = "date-time", value_type = Option<String>)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
}

impl LeaveRequest {
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved.to_string()
    }
}
