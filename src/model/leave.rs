use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    Display,
    EnumString,
    ToSchema,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Sick,
    Casual,
    Annual,
    Unpaid,
}

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    Display,
    EnumString,
    ToSchema,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 42)]
    pub user_id: u64,

    #[schema(example = "sick")]
    pub leave_type: LeaveType,

    #[schema(example = "2026-08-10", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-08-12", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "flu, doctor's note attached")]
    pub reason: String,

    #[schema(example = "pending")]
    pub status: LeaveStatus,

    #[schema(example = "approved, get well soon", nullable = true)]
    pub admin_notes: Option<String>,

    #[schema(example = "2026-08-06T08:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}
