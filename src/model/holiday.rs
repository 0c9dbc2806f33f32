use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Company holiday. A full-day holiday removes the whole day from the
/// working-day count, a half-day holiday removes 0.5.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Holiday {
    pub id: u64,
    #[schema(example = "2024-04-03", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Nyepi")]
    pub name: String,
    pub is_half_day: bool,
}
