use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Duration, Local, NaiveTime};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::session::AuthUser;
use crate::config::Config;
use crate::core::lifecycle::LatenessPolicy;
use crate::core::service::AttendanceService;
use crate::core::summary::MonthlySummary;
use crate::error::ApiError;
use crate::model::attendance::{Attendance, DressingCode};
use crate::model::role::Action;

/// Canonical action names. The portal's original frontend once sent
/// "check-out", which no handler ever matched; that spelling stays rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceAction {
    Checkin,
    Checkout,
}

#[derive(Deserialize, ToSchema)]
pub struct MarkAttendanceRequest {
    #[schema(example = "checkin")]
    pub action: AttendanceAction,
    #[schema(example = "left early for appointment", nullable = true)]
    pub note: Option<String>,
    #[schema(example = "formal", nullable = true)]
    pub dressing: Option<DressingCode>,
}

#[derive(Deserialize, IntoParams)]
pub struct AttendanceQuery {
    /// Another user's records; admin only.
    #[serde(alias = "userId")]
    pub user_id: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
pub struct SummaryQuery {
    #[serde(alias = "userId")]
    pub user_id: Option<u64>,
    /// 1-12; defaults to the current month.
    pub month: Option<u32>,
    /// Defaults to the current year.
    pub year: Option<i32>,
}

async fn entry_time_of(pool: &MySqlPool, user_id: u64) -> Result<NaiveTime, ApiError> {
    sqlx::query_scalar::<_, NaiveTime>("SELECT entry_time FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("user"))
}

/// Check-in / check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 200, description = "Today's record after the transition", body = Attendance),
        (status = 400, description = "Already checked in / out, no check-in found, or invalid time order"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("session_cookie" = [])),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<MarkAttendanceRequest>,
) -> Result<impl Responder, ApiError> {
    auth.authorize(Action::MarkAttendance)?;

    let service = AttendanceService::new(pool.get_ref().clone());
    let now = Local::now().naive_local();

    let record = match payload.action {
        AttendanceAction::Checkin => {
            let entry_time = entry_time_of(pool.get_ref(), auth.user_id).await?;
            let policy = LatenessPolicy {
                entry_time,
                grace: Duration::minutes(config.grace_minutes),
            };
            service
                .check_in(
                    auth.user_id,
                    now,
                    &policy,
                    payload.dressing.unwrap_or(DressingCode::None),
                    payload.note.as_deref(),
                )
                .await?
        }
        AttendanceAction::Checkout => {
            service
                .check_out(auth.user_id, now, payload.note.as_deref())
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(record))
}

/// Attendance history endpoint
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Records, newest first", body = [Attendance]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Non-admin asked for another user's records")
    ),
    security(("session_cookie" = [])),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> Result<impl Responder, ApiError> {
    let target = query.user_id.unwrap_or(auth.user_id);
    if target != auth.user_id {
        auth.authorize(Action::ViewOthersAttendance)?;
    }

    let service = AttendanceService::new(pool.get_ref().clone());
    let records = service.records_for(target).await?;

    Ok(HttpResponse::Ok().json(records))
}

/// Monthly summary endpoint
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Counts plus the month's records", body = MonthlySummary),
        (status = 400, description = "Month out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Non-admin asked for another user's summary")
    ),
    security(("session_cookie" = [])),
    tag = "Attendance"
)]
pub async fn monthly_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<SummaryQuery>,
) -> Result<impl Responder, ApiError> {
    let target = query.user_id.unwrap_or(auth.user_id);
    if target != auth.user_id {
        auth.authorize(Action::ViewOthersAttendance)?;
    }

    let today = Local::now().date_naive();
    let month = query.month.unwrap_or_else(|| today.month());
    let year = query.year.unwrap_or_else(|| today.year());

    if !(1..=12).contains(&month) {
        return Err(ApiError::validation("month must be between 1 and 12"));
    }

    let service = AttendanceService::new(pool.get_ref().clone());
    let summary = service
        .monthly_summary(target, month, year, config.expected_working_days)
        .await?;

    Ok(HttpResponse::Ok().json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_action_names_accepted() {
        let checkin: MarkAttendanceRequest =
            serde_json::from_value(json!({"action": "checkin"})).unwrap();
        assert_eq!(checkin.action, AttendanceAction::Checkin);

        let checkout: MarkAttendanceRequest =
            serde_json::from_value(json!({"action": "checkout", "note": "done"})).unwrap();
        assert_eq!(checkout.action, AttendanceAction::Checkout);
        assert_eq!(checkout.note.as_deref(), Some("done"));
    }

    #[test]
    fn test_hyphenated_checkout_spelling_rejected() {
        let result =
            serde_json::from_value::<MarkAttendanceRequest>(json!({"action": "check-out"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_dressing_parsed_when_present() {
        let req: MarkAttendanceRequest =
            serde_json::from_value(json!({"action": "checkin", "dressing": "casual"}))
                .unwrap();
        assert_eq!(req.dressing, Some(DressingCode::Casual));
    }
}
