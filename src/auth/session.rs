use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::error::ApiError;
use crate::model::role::{Action, Role};

/// Name of the HTTP-only session cookie.
pub const SESSION_COOKIE: &str = "auth_token";

/// Authenticated caller, decoded once by the auth middleware and stashed in
/// request extensions. The extractor never re-verifies the token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn authorize(&self, action: Action) -> Result<(), ApiError> {
        if self.role.allows(action) {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or(ApiError::Unauthorized),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: 42,
            email: "jane@company.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_employee_cannot_view_others_attendance() {
        assert_eq!(
            user(Role::Employee).authorize(Action::ViewOthersAttendance),
            Err(ApiError::Forbidden)
        );
    }

    #[test]
    fn test_admin_passes_capability_check() {
        assert!(user(Role::Admin).authorize(Action::ManageUsers).is_ok());
        assert!(user(Role::Admin).is_admin());
        assert!(!user(Role::Employee).is_admin());
    }
}
