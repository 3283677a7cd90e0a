use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Domain error taxonomy. Every failure a handler can produce maps onto one
/// of these; the `ResponseError` impl turns them into the JSON error payload
/// the frontend shows as a toast.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum ApiError {
    #[display(fmt = "Unauthorized")]
    Unauthorized,

    #[display(fmt = "Forbidden")]
    Forbidden,

    #[display(fmt = "Already checked in today")]
    AlreadyCheckedIn,

    #[display(fmt = "Already checked out today")]
    AlreadyCheckedOut,

    #[display(fmt = "No check-in found for today")]
    NoCheckInFound,

    #[display(fmt = "Check-out cannot be earlier than check-in")]
    InvalidTimeOrder,

    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),

    #[display(fmt = "Internal Server Error")]
    Internal,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::AlreadyCheckedIn
            | ApiError::AlreadyCheckedOut
            | ApiError::NoCheckInFound
            | ApiError::InvalidTimeOrder
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database error");
        ApiError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_follows_taxonomy() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("user").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::AlreadyCheckedIn.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::AlreadyCheckedOut.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NoCheckInFound.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidTimeOrder.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::validation("missing field").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_messages_name_the_error_class() {
        assert_eq!(ApiError::AlreadyCheckedIn.to_string(), "Already checked in today");
        assert_eq!(ApiError::NoCheckInFound.to_string(), "No check-in found for today");
        assert_eq!(ApiError::NotFound("leave request").to_string(), "leave request not found");
    }
}
