use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::role::Role;
use crate::report::assembler;
use crate::report::cache::ReportCache;
use crate::report::source::SqlReportSource;
use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

/// Tagged result wrapper for every report endpoint: exactly one of `data`
/// or `error` is present.
#[derive(Serialize, ToSchema)]
pub struct ReportEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportEnvelope {
    fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

fn upstream_error(context: &str, e: anyhow::Error) -> HttpResponse {
    tracing::error!(error = %e, context, "Report data fetch failed");
    HttpResponse::InternalServerError().json(ReportEnvelope::fail("Failed to assemble report"))
}

/// Serve from the cache or assemble and remember. The filter string is the
/// canonical rendering of every parameter that shaped the report.
async fn cached_report<F, Fut>(
    cache: &ReportCache,
    kind: &str,
    filter: &str,
    assemble: F,
) -> HttpResponse
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<Value>>,
{
    if let Some(hit) = cache.get(kind, filter).await {
        return HttpResponse::Ok().json(ReportEnvelope::ok(hit));
    }

    match assemble().await {
        Ok(value) => {
            cache.insert(kind, filter, value.clone()).await;
            HttpResponse::Ok().json(ReportEnvelope::ok(value))
        }
        Err(e) => upstream_error(kind, e),
    }
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RangeQuery {
    #[schema(example = "2024-04-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-04-30", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// Override of the configured late cutoff, e.g. "09:00:00"
    #[schema(example = "08:00:00", value_type = Option<String>)]
    pub late_cutoff: Option<NaiveTime>,
    /// Entry limit for list-shaped reports
    #[schema(example = 30)]
    pub limit: Option<usize>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct MonthlyQuery {
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = "08:00:00", value_type = Option<String>)]
    pub late_cutoff: Option<NaiveTime>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BalanceQuery {
    /// Defaults to the calling user; only admins may query other users.
    pub user_id: Option<u64>,
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 4, minimum = 1, maximum = 12)]
    pub month: u32,
}

/// Attendance/leave summary for a date range.
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    params(RangeQuery),
    responses(
        (status = 200, description = "Summary report", body = ReportEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Upstream data failure", body = ReportEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
pub async fn summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    cache: web::Data<ReportCache>,
    query: web::Query<RangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let cutoff = query.late_cutoff.unwrap_or(config.late_cutoff);
    let filter = format!("{}:{}:{}", query.start_date, query.end_date, cutoff);
    let source = SqlReportSource::new(pool.get_ref().clone());
    let zone = config.zone;

    Ok(cached_report(cache.get_ref(), "summary", &filter, || async move {
        let report =
            assembler::summary_report(&source, query.start_date, query.end_date, cutoff, zone)
                .await?;
        Ok(serde_json::to_value(report)?)
    })
    .await)
}

/// Per-working-day breakdown, most recent first.
#[utoipa::path(
    get,
    path = "/api/v1/reports/daily",
    params(RangeQuery),
    responses(
        (status = 200, description = "Daily report", body = ReportEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Upstream data failure", body = ReportEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
pub async fn daily(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    cache: web::Data<ReportCache>,
    query: web::Query<RangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let cutoff = query.late_cutoff.unwrap_or(config.late_cutoff);
    let limit = query.limit.unwrap_or(31).min(366);
    let filter = format!(
        "{}:{}:{}:{}",
        query.start_date, query.end_date, cutoff, limit
    );
    let source = SqlReportSource::new(pool.get_ref().clone());
    let zone = config.zone;

    Ok(cached_report(cache.get_ref(), "daily", &filter, || async move {
        let entries = assembler::daily_report(
            &source,
            query.start_date,
            query.end_date,
            limit,
            cutoff,
            zone,
        )
        .await?;
        Ok(serde_json::to_value(entries)?)
    })
    .await)
}

/// Twelve-month breakdown for a year.
#[utoipa::path(
    get,
    path = "/api/v1/reports/monthly",
    params(MonthlyQuery),
    responses(
        (status = 200, description = "Monthly report", body = ReportEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Upstream data failure", body = ReportEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
pub async fn monthly(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    cache: web::Data<ReportCache>,
    query: web::Query<MonthlyQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let cutoff = query.late_cutoff.unwrap_or(config.late_cutoff);
    let filter = format!("{}:{}", query.year, cutoff);
    let source = SqlReportSource::new(pool.get_ref().clone());
    let zone = config.zone;

    Ok(cached_report(cache.get_ref(), "monthly", &filter, || async move {
        let entries = assembler::monthly_report(&source, query.year, cutoff, zone).await?;
        Ok(serde_json::to_value(entries)?)
    })
    .await)
}

/// Employees ranked by late arrivals.
#[utoipa::path(
    get,
    path = "/api/v1/reports/top-late",
    params(RangeQuery),
    responses(
        (status = 200, description = "Top late employees", body = ReportEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Upstream data failure", body = ReportEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
pub async fn top_late(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    cache: web::Data<ReportCache>,
    query: web::Query<RangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let cutoff = query.late_cutoff.unwrap_or(config.late_cutoff);
    let limit = query.limit.unwrap_or(5).min(100);
    let filter = format!(
        "{}:{}:{}:{}",
        query.start_date, query.end_date, cutoff, limit
    );
    let source = SqlReportSource::new(pool.get_ref().clone());
    let zone = config.zone;

    Ok(cached_report(cache.get_ref(), "top_late", &filter, || async move {
        let ranking = assembler::top_late_employees(
            &source,
            query.start_date,
            query.end_date,
            limit,
            cutoff,
            zone,
        )
        .await?;
        Ok(serde_json::to_value(ranking)?)
    })
    .await)
}

/// Quota, used days, and remaining leave for one user's month.
#[utoipa::path(
    get,
    path = "/api/v1/reports/leave-balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Leave balance", body = ReportEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Upstream data failure", body = ReportEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
pub async fn leave_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    cache: web::Data<ReportCache>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = query.user_id.unwrap_or(auth.user_id);
    if user_id != auth.user_id && auth.role != Role::Admin {
        return Err(actix_web::error::ErrorForbidden("Admin only"));
    }

    if !(1..=12).contains(&query.month) {
        return Ok(HttpResponse::BadRequest()
            .json(ReportEnvelope::fail("month must be between 1 and 12")));
    }

    let filter = format!("{}:{}:{}", user_id, query.year, query.month);
    let source = SqlReportSource::new(pool.get_ref().clone());
    let default_quota = config.default_leave_quota;

    Ok(cached_report(cache.get_ref(), "leave_balance", &filter, || async move {
        let balance = assembler::leave_balance(
            &source,
            user_id,
            query.year,
            query.month,
            default_quota,
        )
        .await?;
        Ok(serde_json::to_value(balance)?)
    })
    .await)
}
