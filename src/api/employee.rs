use crate::auth::auth::AuthUser;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::report::cache::ReportCache;

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeResponse {
    pub id: u64,
    #[schema(example = "budi")]
    pub username: String,
    #[schema(example = "Budi Santoso")]
    pub full_name: String,
    pub role_id: u8,
    pub is_active: bool,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Restrict to active or inactive accounts
    pub is_active: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct SetEmployeeStatus {
    pub is_active: bool,
}

/// List employees (Admin)
#[utoipa::path(
    get,
    path = "/api/v1/employee",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE role_id = 2");
    if query.is_active.is_some() {
        where_sql.push_str(" AND is_active = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM users{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(active) = query.is_active {
        count_q = count_q.bind(active);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count employees");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, username, full_name, role_id, is_active
        FROM users
        {}
        ORDER BY username ASC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, EmployeeResponse>(&data_sql);
    if let Some(active) = query.is_active {
        data_q = data_q.bind(active);
    }

    let employees = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch employee list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Activate or deactivate an employee (Admin). Deactivated accounts drop
/// out of the active-employee count behind the attendance reports.
#[utoipa::path(
    put,
    path = "/api/v1/employee/{user_id}/status",
    request_body = SetEmployeeStatus,
    params(
        ("user_id" = u64, Path, description = "User to update")
    ),
    responses(
        (status = 200, description = "Status updated", body = Object, example = json!({
            "message": "Employee status updated"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn set_employee_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    cache: web::Data<ReportCache>,
    path: web::Path<u64>,
    payload: web::Json<SetEmployeeStatus>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let user_id = path.into_inner();
    let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ? AND role_id = 2")
        .bind(payload.is_active)
        .bind(user_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to update employee status");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    cache.invalidate_all();
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee status updated"
    })))
}
