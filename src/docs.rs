use crate::api::announcements::CreateAnnouncementRequest;
use crate::api::attendance::{AttendanceAction, MarkAttendanceRequest};
use crate::api::leaves::{CreateLeaveRequest, ReviewLeaveRequest};
use crate::auth::session::SESSION_COOKIE;
use crate::core::summary::MonthlySummary;
use crate::model::announcement::Announcement;
use crate::model::attendance::{Attendance, AttendanceStatus, DressingCode};
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::user::UserProfile;
use crate::models::{LoginRequest, SessionUser, SignupRequest};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Portal API",
        version = "1.0.0",
        description = r#"
## HR Attendance Portal

Backend for an attendance portal where employees check in and out by QR scan
and admins run the rest of the HR day-to-day.

### 🔹 Key Features
- **Attendance**
  - Daily check-in / check-out with lateness classification
  - Per-month summaries (present / late / leave / inferred absences)
- **Employee Directory**
  - Admin listing and profile updates, including shift windows
- **Leave Management**
  - File requests, admin approval / rejection with notes
- **Announcements**
  - Company-wide notices published by admins

### 🔐 Security
Sessions are HTTP-only, SameSite=Strict cookies holding a signed token.
Admin-only operations are enforced by a capability check on the session role.

### 📦 Response Format
- JSON-based RESTful responses
- Errors arrive as `{"error": "<message>"}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::signup,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::monthly_summary,

        crate::api::users::list_users,
        crate::api::users::update_user,

        crate::api::leaves::list_leaves,
        crate::api::leaves::create_leave,
        crate::api::leaves::review_leave,

        crate::api::announcements::list_announcements,
        crate::api::announcements::create_announcement,
        crate::api::announcements::delete_announcement,
    ),
    components(
        schemas(
            LoginRequest,
            SignupRequest,
            SessionUser,
            MarkAttendanceRequest,
            AttendanceAction,
            Attendance,
            AttendanceStatus,
            DressingCode,
            MonthlySummary,
            UserProfile,
            CreateLeaveRequest,
            ReviewLeaveRequest,
            LeaveRequest,
            LeaveType,
            LeaveStatus,
            CreateAnnouncementRequest,
            Announcement
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Session management APIs"),
        (name = "Attendance", description = "Check-in / check-out and summaries"),
        (name = "Users", description = "Employee directory APIs"),
        (name = "Leaves", description = "Leave request APIs"),
        (name = "Announcements", description = "Company announcement APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}
