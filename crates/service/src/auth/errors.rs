use thiserror::Error;

use crate::errors::FieldErrors;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("already taken: {0}")]
    Conflict(FieldErrors),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("insufficient privilege")]
    Forbidden,
    #[error("user not found")]
    NotFound,
    #[error("no token bound to the authenticated user")]
    TokenMissing,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict(_) => 1002,
            AuthError::NotFound => 1003,
            AuthError::Unauthorized => 1004,
            AuthError::Forbidden => 1005,
            AuthError::HashError(_) => 1101,
            AuthError::TokenMissing => 1102,
            AuthError::Repository(_) => 1200,
        }
    }

    /// Failures that are logged in full and reported to callers opaquely.
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::HashError(_) | AuthError::TokenMissing | AuthError::Repository(_))
    }
}

impl From<models::errors::ModelError> for AuthError {
    fn from(e: models::errors::ModelError) -> Self {
        use models::errors::ModelError;
        match e {
            ModelError::Validation(msg) => AuthError::Validation(FieldErrors::single("non_field_errors", msg)),
            ModelError::Conflict(_) => AuthError::Conflict(FieldErrors::single(
                "non_field_errors",
                "A user with that username or email already exists.",
            )),
            ModelError::Db(msg) => AuthError::Repository(msg),
        }
    }
}
