use actix_web::{HttpResponse, Responder, web};
use serde_json::Value;
use sqlx::MySqlPool;

use crate::auth::session::AuthUser;
use crate::error::ApiError;
use crate::model::role::{Action, Role};
use crate::model::user::UserProfile;
use crate::utils::db_utils::{build_update_sql, execute_update};

const PROFILE_COLUMNS: &str = "id, email, full_name, role_id, phone, cnic, position, \
     department, shift, salary, entry_time, exit_time, break_start, break_end, \
     annual_leaves, casual_leaves, status, created_at";

/// Columns an admin may touch through the directory PATCH. Credentials and
/// email stay out; email feeds the signup uniqueness filter.
const UPDATABLE_COLUMNS: &[&str] = &[
    "full_name",
    "role_id",
    "phone",
    "cnic",
    "position",
    "department",
    "shift",
    "salary",
    "entry_time",
    "exit_time",
    "break_start",
    "break_end",
    "annual_leaves",
    "casual_leaves",
    "status",
];

/// Employee directory endpoint
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Employee directory, sorted by name", body = [UserProfile]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("session_cookie" = [])),
    tag = "Users"
)]
pub async fn list_users(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    auth.authorize(Action::ViewDirectory)?;

    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM users WHERE role_id = ? ORDER BY full_name ASC"
    );
    let users = sqlx::query_as::<_, UserProfile>(&sql)
        .bind(Role::Employee.id())
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(users))
}

/// Directory update endpoint. Accepts `{id, updates: {...}}` or `{id,
/// ...fields}`; either way only whitelisted columns reach the UPDATE.
#[utoipa::path(
    patch,
    path = "/api/users",
    request_body = Object,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Missing id or no updatable fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    security(("session_cookie" = [])),
    tag = "Users"
)]
pub async fn update_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: web::Json<Value>,
) -> Result<impl Responder, ApiError> {
    auth.authorize(Action::ManageUsers)?;

    let obj = body
        .as_object()
        .ok_or_else(|| ApiError::validation("Payload must be a JSON object"))?;

    let id = obj
        .get("id")
        .or_else(|| obj.get("user_id"))
        .or_else(|| obj.get("userId"))
        .and_then(Value::as_u64)
        .ok_or_else(|| ApiError::validation("id required"))?;

    let updates = match obj.get("updates") {
        Some(nested) => nested.clone(),
        None => {
            let mut rest = obj.clone();
            rest.remove("id");
            rest.remove("user_id");
            rest.remove("userId");
            Value::Object(rest)
        }
    };

    // MySQL reports zero affected rows for a no-op update, so existence is
    // checked up front rather than inferred from rows_affected.
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
            .bind(id)
            .fetch_one(pool.get_ref())
            .await?;
    if !exists {
        return Err(ApiError::NotFound("user"));
    }

    let update = build_update_sql("users", &updates, UPDATABLE_COLUMNS, "id", id)?;
    execute_update(pool.get_ref(), update).await?;

    let sql = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = ?");
    let user = sqlx::query_as::<_, UserProfile>(&sql)
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(HttpResponse::Ok().json(user))
}
