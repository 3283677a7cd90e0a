use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::session::AuthUser;
use crate::error::ApiError;
use crate::model::announcement::Announcement;
use crate::model::role::Action;

const ANNOUNCEMENT_COLUMNS: &str = "id, title, body, created_by, created_at";

#[derive(Deserialize, ToSchema)]
pub struct CreateAnnouncementRequest {
    #[schema(example = "Office closed Friday")]
    pub title: String,
    #[schema(example = "The office will be closed this Friday for maintenance.")]
    pub body: String,
}

/// Announcement feed endpoint
#[utoipa::path(
    get,
    path = "/api/announcements",
    responses(
        (status = 200, description = "Announcements, newest first", body = [Announcement]),
        (status = 401, description = "Unauthorized")
    ),
    security(("session_cookie" = [])),
    tag = "Announcements"
)]
pub async fn list_announcements(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    auth.authorize(Action::ReadAnnouncements)?;

    let sql = format!(
        "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements ORDER BY created_at DESC"
    );
    let announcements = sqlx::query_as::<_, Announcement>(&sql)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(announcements))
}

/// Announcement publish endpoint (admin)
#[utoipa::path(
    post,
    path = "/api/announcements",
    request_body = CreateAnnouncementRequest,
    responses(
        (status = 201, description = "Published announcement", body = Announcement),
        (status = 400, description = "Empty title or body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("session_cookie" = [])),
    tag = "Announcements"
)]
pub async fn create_announcement(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateAnnouncementRequest>,
) -> Result<impl Responder, ApiError> {
    auth.authorize(Action::PublishAnnouncements)?;

    if payload.title.trim().is_empty() || payload.body.trim().is_empty() {
        return Err(ApiError::validation("title and body are required"));
    }

    let result = sqlx::query(
        "INSERT INTO announcements (title, body, created_by) VALUES (?, ?, ?)",
    )
    .bind(payload.title.trim())
    .bind(payload.body.trim())
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to publish announcement");
        ApiError::Internal
    })?;

    let sql = format!("SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE id = ?");
    let announcement = sqlx::query_as::<_, Announcement>(&sql)
        .bind(result.last_insert_id())
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Created().json(announcement))
}

/// Announcement delete endpoint (admin)
#[utoipa::path(
    delete,
    path = "/api/announcements/{id}",
    params(
        ("id" = u64, Path, description = "Announcement ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({"success": true})),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Announcement not found")
    ),
    security(("session_cookie" = [])),
    tag = "Announcements"
)]
pub async fn delete_announcement(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<impl Responder, ApiError> {
    auth.authorize(Action::PublishAnnouncements)?;

    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id, "Failed to delete announcement");
            ApiError::Internal
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("announcement"));
    }

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
