use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Employee profile as returned by the directory endpoints. The password
/// hash lives in the same table but never in this struct.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct UserProfile {
    #[schema(example = 42)]
    pub id: u64,

    #[schema(example = "jane.doe@company.com")]
    pub email: String,

    #[schema(example = "Jane Doe")]
    pub full_name: String,

    /// 1 = admin, 2 = employee
    #[schema(example = 2)]
    pub role_id: u8,

    #[schema(example = "+923001234567", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = "35202-1234567-1", nullable = true)]
    pub cnic: Option<String>,

    #[schema(example = "Associate")]
    pub position: String,

    #[schema(example = "Operations")]
    pub department: String,

    #[schema(example = "Day Shift")]
    pub shift: String,

    #[schema(example = "0")]
    pub salary: String,

    #[schema(example = "09:00:00", value_type = String)]
    pub entry_time: NaiveTime,

    #[schema(example = "18:00:00", value_type = String)]
    pub exit_time: NaiveTime,

    #[schema(example = "13:00:00", value_type = String)]
    pub break_start: NaiveTime,

    #[schema(example = "14:00:00", value_type = String)]
    pub break_end: NaiveTime,

    #[schema(example = 20)]
    pub annual_leaves: u32,

    #[schema(example = 0)]
    pub casual_leaves: u32,

    #[schema(example = "active")]
    pub status: String,

    #[schema(example = "2026-01-01T00:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}
