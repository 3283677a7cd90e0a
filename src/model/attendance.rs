use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Daily attendance outcome as stored in the `status` column.
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
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
    Leave,
}

/// Dress code observed at check-in time.
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
pub enum DressingCode {
    Casual,
    Formal,
    None,
}

/// One row per (user, calendar date); the `(user_id, date)` unique key is the
/// store-level guard behind the one-record-per-day invariant.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 42)]
    pub user_id: u64,

    #[schema(example = "2026-08-06", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2026-08-06T09:02:11", value_type = String, format = "date-time", nullable = true)]
    pub check_in: Option<NaiveDateTime>,

    #[schema(example = "2026-08-06T18:01:40", value_type = String, format = "date-time", nullable = true)]
    pub check_out: Option<NaiveDateTime>,

    #[schema(example = "present")]
    pub status: AttendanceStatus,

    #[schema(example = "left early for appointment", nullable = true)]
    pub note: Option<String>,

    #[schema(example = "formal")]
    pub dressing: DressingCode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_string_forms() {
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "half-day");
        assert_eq!(AttendanceStatus::Present.to_string(), "present");
        assert_eq!(
            AttendanceStatus::from_str("half-day").unwrap(),
            AttendanceStatus::HalfDay
        );
        assert!(AttendanceStatus::from_str("half_day").is_err());
    }

    #[test]
    fn test_dressing_wire_form_is_lowercase() {
        assert_eq!(DressingCode::None.to_string(), "none");
        assert_eq!(
            serde_json::from_str::<DressingCode>("\"formal\"").unwrap(),
            DressingCode::Formal
        );
    }
}
