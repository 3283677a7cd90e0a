use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::session::AuthUser;
use crate::error::ApiError;
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::role::Action;

const LEAVE_COLUMNS: &str =
    "id, user_id, leave_type, start_date, end_date, reason, status, admin_notes, created_at";

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveRequest {
    #[schema(example = "sick")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-08-10", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-08-12", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    #[schema(example = "flu, doctor's note attached")]
    pub reason: String,
}

#[derive(Deserialize, IntoParams)]
pub struct LeaveQuery {
    /// Admin-only filter; employees always see their own requests.
    #[serde(alias = "userId")]
    pub user_id: Option<u64>,
    pub status: Option<LeaveStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct ReviewLeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    /// "approved" or "rejected"
    #[schema(example = "approved")]
    pub status: LeaveStatus,
    #[schema(example = "approved, get well soon", nullable = true)]
    pub admin_notes: Option<String>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
}

async fn fetch_leave(pool: &MySqlPool, id: u64) -> Result<LeaveRequest, ApiError> {
    let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?");
    sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("leave request"))
}

/// Leave list endpoint
#[utoipa::path(
    get,
    path = "/api/leaves",
    params(LeaveQuery),
    responses(
        (status = 200, description = "Leave requests, newest first", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(("session_cookie" = [])),
    tag = "Leaves"
)]
pub async fn list_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveQuery>,
) -> Result<impl Responder, ApiError> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if auth.is_admin() {
        if let Some(user_id) = query.user_id {
            where_sql.push_str(" AND user_id = ?");
            args.push(FilterValue::U64(user_id));
        }
    } else {
        // Employees only ever see their own requests.
        where_sql.push_str(" AND user_id = ?");
        args.push(FilterValue::U64(auth.user_id));
    }

    if let Some(status) = query.status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }

    let sql = format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests{} ORDER BY created_at DESC",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q.fetch_all(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(leaves))
}

/// Leave creation endpoint
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Request filed as pending", body = LeaveRequest),
        (status = 400, description = "Bad date order or empty reason"),
        (status = 401, description = "Unauthorized")
    ),
    security(("session_cookie" = [])),
    tag = "Leaves"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveRequest>,
) -> Result<impl Responder, ApiError> {
    auth.authorize(Action::RequestLeave)?;

    if payload.start_date > payload.end_date {
        return Err(ApiError::validation("start_date cannot be after end_date"));
    }

    if payload.reason.trim().is_empty() {
        return Err(ApiError::validation("reason is required"));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (user_id, leave_type, start_date, end_date, reason, status)
        VALUES (?, ?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.leave_type)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.reason.trim())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to create leave request");
        ApiError::Internal
    })?;

    let leave = fetch_leave(pool.get_ref(), result.last_insert_id()).await?;

    Ok(HttpResponse::Created().json(leave))
}

/// Leave review endpoint (admin)
#[utoipa::path(
    patch,
    path = "/api/leaves",
    request_body = ReviewLeaveRequest,
    responses(
        (status = 200, description = "Reviewed request", body = LeaveRequest),
        (status = 400, description = "Request missing or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("session_cookie" = [])),
    tag = "Leaves"
)]
pub async fn review_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ReviewLeaveRequest>,
) -> Result<impl Responder, ApiError> {
    auth.authorize(Action::ReviewLeave)?;

    if payload.status == LeaveStatus::Pending {
        return Err(ApiError::validation("status must be approved or rejected"));
    }

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, admin_notes = ?
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(payload.status)
    .bind(payload.admin_notes.as_deref())
    .bind(payload.id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id = payload.id, "Leave review failed");
        ApiError::Internal
    })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::validation(
            "Leave request not found or already processed",
        ));
    }

    let leave = fetch_leave(pool.get_ref(), payload.id).await?;

    Ok(HttpResponse::Ok().json(leave))
}
