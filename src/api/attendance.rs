use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::report::cache::ReportCache;
use crate::report::timezone;
use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CheckInPayload {
    #[schema(example = "working from the office")]
    pub note: Option<String>,
}

/// Check-in endpoint. The record's calendar day is the current day in the
/// configured local zone, never the raw UTC date.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body(content = CheckInPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "late": false
        })),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    cache: web::Data<ReportCache>,
    payload: web::Json<CheckInPayload>,
) -> actix_web::Result<impl Responder> {
    let now = Utc::now();
    let local_date = timezone::to_local_date(now, config.zone);
    // Late is a reporting-time judgement; the stored status stays "present".
    let is_late = timezone::to_local_time(now, config.zone) > config.late_cutoff;

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (user_id, date, check_in, status, note)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(local_date)
    .bind(now)
    .bind(AttendanceStatus::Present.to_string())
    .bind(payload.note.as_deref())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            cache.invalidate_all();
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Checked in successfully",
                "late": is_late
            })))
        }

        Err(e) => {
            // Duplicate check-in for same day (unique key on user_id + date)
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already checked in today"
                    })));
                }
            }

            tracing::error!(error = %e, user_id = auth.user_id, "Check-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully"
        })),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    cache: web::Data<ReportCache>,
) -> actix_web::Result<impl Responder> {
    let now = Utc::now();
    let local_date = timezone::to_local_date(now, config.zone);

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out = ?, status = ?
        WHERE user_id = ?
        AND date = ?
        AND check_out IS NULL
        "#,
    )
    .bind(now)
    .bind(AttendanceStatus::Departed.to_string())
    .bind(auth.user_id)
    .bind(local_date)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active check-in found for today"
        })));
    }

    cache.invalidate_all();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully"
    })))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    #[schema(example = "2024-04-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-04-30", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// Restrict to one user
    pub user_id: Option<u64>,
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Raw attendance rows for a date range (admin).
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Paginated attendance list", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE date BETWEEN ? AND ?");
    if query.user_id.is_some() {
        where_sql.push_str(" AND user_id = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM attendance{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(query.start_date)
        .bind(query.end_date);
    if let Some(user_id) = query.user_id {
        count_q = count_q.bind(user_id);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count attendance rows");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, user_id, date, check_in, check_out, status, note
        FROM attendance
        {}
        ORDER BY date DESC, user_id ASC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceRecord>(&data_sql)
        .bind(query.start_date)
        .bind(query.end_date);
    if let Some(user_id) = query.user_id {
        data_q = data_q.bind(user_id);
    }

    let rows = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch attendance list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data: rows,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
