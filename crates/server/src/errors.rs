use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use service::auth::errors::AuthError;
use service::errors::{FieldErrors, ServiceError};
use thiserror::Error;
use tracing::error;

pub const INTERNAL_DETAIL: &str = "An unexpected error occurred. Please try again later.";

/// Single mapping from business errors to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// Bad username/password at login.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Missing, unknown or expired token.
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(errs) | AuthError::Conflict(errs) => ApiError::Validation(errs),
            AuthError::Unauthorized => ApiError::Unauthorized,
            AuthError::Forbidden => ApiError::Forbidden,
            AuthError::NotFound => ApiError::NotFound("Not found.".into()),
            other => ApiError::Internal(format!("[{}] {}", other.code(), other)),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errs) => ApiError::Validation(errs),
            ServiceError::Conflict(detail) => ApiError::Validation(FieldErrors::single("non_field_errors", detail)),
            ServiceError::NotFound(_) => ApiError::NotFound("Not found.".into()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(FieldErrors::single("non_field_errors", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errs) => (StatusCode::BAD_REQUEST, Json(errs)).into_response(),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid credentials"}))).into_response()
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Authentication credentials were not provided or are invalid."})),
            )
                .into_response(),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({"detail": "You do not have permission to perform this action."})),
            )
                .into_response(),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, Json(json!({"detail": detail}))).into_response(),
            ApiError::Internal(msg) => {
                // full detail stays in the log
                error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": INTERNAL_DETAIL}))).into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
