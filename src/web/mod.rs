//! HTTP surface
//!
//! Maps validation, authentication and lifecycle errors onto status codes and
//! a `{ "message", "code"? }` JSON body.

pub mod app;
pub mod handlers;
pub mod state;

pub use app::build_router;
pub use state::AppState;

use crate::auth::AuthError;
use crate::core::ActivityError;
use crate::validation::ValidationError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
}

#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    MalformedBody(String),
    Auth(AuthError),
    Activity(ActivityError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<ActivityError> for ApiError {
    fn from(err: ActivityError) -> Self {
        ApiError::Activity(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::MissingToken | AuthError::InvalidToken(_)) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Activity(ActivityError::Invalid(_)) => StatusCode::BAD_REQUEST,
            ApiError::Activity(ActivityError::Forbidden(_)) => StatusCode::FORBIDDEN,
            ApiError::Activity(ActivityError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Activity(ActivityError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        let message = match self {
            ApiError::Validation(err) => format!("ValidationError: {err}"),
            ApiError::MalformedBody(msg) => format!("ValidationError: {msg}"),
            ApiError::Activity(ActivityError::Invalid(msg)) => format!("ValidationError: {msg}"),
            _ if self.status() == StatusCode::INTERNAL_SERVER_ERROR => {
                "internal server error".to_string()
            }
            ApiError::Auth(err) => err.to_string(),
            ApiError::Activity(err) => err.to_string(),
        };
        let code = match self {
            ApiError::Activity(err) => err.code(),
            _ => None,
        };
        ErrorResponse { message, code }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = ?self, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InvalidTokenReason;
    use crate::storage::StorageError;
    use crate::validation::ValidationReason;

    #[test]
    fn not_found_carries_stable_code() {
        let err = ApiError::from(ActivityError::activity_not_found());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.body(),
            ErrorResponse {
                message: "Activity not found".to_string(),
                code: Some(200100),
            }
        );
    }

    #[test]
    fn validation_errors_are_prefixed() {
        let err = ApiError::from(ValidationError::new(
            "content-type",
            None,
            ValidationReason::Required,
        ));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().message, "ValidationError: \"content-type\" is required");
        assert_eq!(err.body().code, None);
    }

    #[test]
    fn auth_errors_map_to_unauthorized() {
        let missing = ApiError::from(AuthError::MissingToken);
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(missing.body().message, "Authentication error. Token required.");

        let invalid = ApiError::from(AuthError::InvalidToken(InvalidTokenReason::Expired));
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            invalid.body().message,
            "Authentication error. Invalid token.Invalid JWT"
        );
    }

    #[test]
    fn forbidden_transition_maps_to_403() {
        let err = ApiError::from(ActivityError::forbidden("Can not archive a deleted activity"));
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.body().message, "Can not archive a deleted activity");
    }

    #[test]
    fn storage_failures_hide_details() {
        let err = ApiError::from(ActivityError::from(StorageError::Io(std::io::Error::other(
            "disk full",
        ))));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().message, "internal server error");
    }
}
