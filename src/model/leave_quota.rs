use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Monthly leave allotment for one user. One row per (user, year, month),
/// upserted when an admin resets quotas.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveQuotaEntry {
    pub user_id: u64,
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 4, minimum = 1, maximum = 12)]
    pub month: u32,
    /// Allotted days for the month, baseline 2. No rollover between months.
    #[schema(example = 2.0)]
    pub quota: f64,
}
