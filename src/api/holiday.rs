use crate::auth::auth::AuthUser;
use crate::model::holiday::Holiday;
use crate::report::cache::ReportCache;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateHoliday {
    #[schema(example = "2024-04-03", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Nyepi")]
    pub name: String,
    /// Half-day holidays deduct 0.5 working days instead of the full day.
    #[serde(default)]
    pub is_half_day: bool,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HolidayFilter {
    #[schema(example = "2024-01-01", format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2024-12-31", format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
}

/// Create holiday (Admin)
#[utoipa::path(
    post,
    path = "/api/v1/holiday",
    request_body = CreateHoliday,
    responses(
        (status = 201, description = "Holiday created", body = Object, example = json!({
            "message": "Holiday created"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Holiday already exists for that date")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn create_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    cache: web::Data<ReportCache>,
    payload: web::Json<CreateHoliday>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO holidays (date, name, is_half_day)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(payload.date)
    .bind(&payload.name)
    .bind(payload.is_half_day)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            cache.invalidate_all();
            Ok(HttpResponse::Created().json(serde_json::json!({
                "message": "Holiday created"
            })))
        }
        Err(e) => {
            // Unique key on date
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(serde_json::json!({
                        "message": "Holiday already exists for that date"
                    })));
                }
            }
            tracing::error!(error = %e, "Failed to create holiday");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// List holidays, optionally bounded to a date range.
#[utoipa::path(
    get,
    path = "/api/v1/holiday",
    params(HolidayFilter),
    responses(
        (status = 200, description = "Holiday list", body = [Holiday]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn holiday_list(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HolidayFilter>,
) -> actix_web::Result<impl Responder> {
    let mut sql = String::from(
        "SELECT id, date, name, is_half_day FROM holidays WHERE 1=1",
    );
    if query.start_date.is_some() {
        sql.push_str(" AND date >= ?");
    }
    if query.end_date.is_some() {
        sql.push_str(" AND date <= ?");
    }
    sql.push_str(" ORDER BY date ASC");

    let mut q = sqlx::query_as::<_, Holiday>(&sql);
    if let Some(start) = query.start_date {
        q = q.bind(start);
    }
    if let Some(end) = query.end_date {
        q = q.bind(end);
    }

    let holidays = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch holidays");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(holidays))
}

/// Delete holiday (Admin)
#[utoipa::path(
    delete,
    path = "/api/v1/holiday/{holiday_id}",
    params(
        ("holiday_id" = u64, Path, description = "ID of the holiday to delete")
    ),
    responses(
        (status = 200, description = "Holiday deleted", body = Object, example = json!({
            "message": "Holiday deleted"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Holiday not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn delete_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    cache: web::Data<ReportCache>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let holiday_id = path.into_inner();
    let result = sqlx::query("DELETE FROM holidays WHERE id = ?")
        .bind(holiday_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, holiday_id, "Failed to delete holiday");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Holiday not found"
        })));
    }

    cache.invalidate_all();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Holiday deleted"
    })))
}
