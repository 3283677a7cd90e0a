use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Announcement {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Office closed Friday")]
    pub title: String,

    #[schema(example = "The office will be closed this Friday for maintenance.")]
    pub body: String,

    /// User id of the admin who published it.
    #[schema(example = 1)]
    pub created_by: u64,

    #[schema(example = "2026-08-06T08:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}
