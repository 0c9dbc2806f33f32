use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// One attendance row per user per local calendar day. Created on the first
/// check-in of the day, mutated once to add `check_out`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: u64,
    pub user_id: u64,
    /// Local calendar day the record belongs to.
    #[schema(example = "2024-04-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// Stored UTC instant of the check-in, if any.
    #[schema(example = "2024-04-01T01:05:00Z", format = "date-time", value_type = Option<String>)]
    pub check_in: Option<DateTime<Utc>>,
    #[schema(example = "2024-04-01T10:00:00Z", format = "date-time", value_type = Option<String>)]
    pub check_out: Option<DateTime<Utc>>,
    #[schema(example = "present", value_type = String)]
    pub status: String,
    pub note: Option<String>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Departed,
    Absent,
}
