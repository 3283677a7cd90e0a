use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Session token payload: user id, email, numeric role, expiry, token id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String, // email
    pub role: u8,
    pub exp: usize,
    pub jti: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "hunter2")]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "jane.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "hunter2")]
    pub password: String,
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    /// "admin" or "employee"; anything else falls back to employee.
    #[schema(example = "employee", nullable = true)]
    pub role: Option<String>,
    pub phone: Option<String>,
    pub cnic: Option<String>,
    #[schema(example = "Associate", nullable = true)]
    pub position: Option<String>,
    #[schema(example = "Operations", nullable = true)]
    pub department: Option<String>,
    #[schema(example = "Day Shift", nullable = true)]
    pub shift: Option<String>,
    pub salary: Option<String>,
    /// Shift window, "HH:MM" or "HH:MM:SS".
    #[schema(example = "09:00", nullable = true)]
    pub entry_time: Option<String>,
    #[schema(example = "18:00", nullable = true)]
    pub exit_time: Option<String>,
    #[schema(example = "13:00", nullable = true)]
    pub break_start: Option<String>,
    #[schema(example = "14:00", nullable = true)]
    pub break_end: Option<String>,
}

/// Credential row fetched at login; the only place the hash leaves the table.
#[derive(FromRow)]
pub struct UserAuthRow {
    pub id: u64,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role_id: u8,
    pub department: String,
    pub shift: String,
}

/// Profile summary echoed by login and `/auth/me`.
#[derive(Serialize, FromRow, ToSchema)]
pub struct SessionUser {
    #[schema(example = 42)]
    pub id: u64,
    #[schema(example = "jane.doe@company.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    /// "admin" or "employee"
    #[schema(example = "employee")]
    pub role: String,
    #[schema(example = "Operations")]
    pub department: String,
    #[schema(example = "Day Shift")]
    pub shift: String,
}

/// Default shift window applied when signup omits the fields.
pub const DEFAULT_ENTRY_TIME: &str = "09:00";
pub const DEFAULT_EXIT_TIME: &str = "18:00";
pub const DEFAULT_BREAK_START: &str = "13:00";
pub const DEFAULT_BREAK_END: &str = "14:00";

/// Accepts the wire forms the portal has always sent: "HH:MM" or "HH:MM:SS".
pub fn parse_shift_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shift_time_accepts_both_forms() {
        assert_eq!(
            parse_shift_time("09:00"),
            NaiveTime::from_hms_opt(9, 0, 0)
        );
        assert_eq!(
            parse_shift_time("18:30:15"),
            NaiveTime::from_hms_opt(18, 30, 15)
        );
        assert_eq!(parse_shift_time("9am"), None);
    }
}
