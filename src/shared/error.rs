//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

/// Login page that unauthenticated requests are redirected to.
pub const LOGIN_PATH: &str = "/users/login";

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Email or username already exists")]
    DuplicateIdentity,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Not the owner of this resource")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Asset upload failed: {0}")]
    UpstreamUploadFailure(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Build the login redirect carrying a transient notice code.
pub fn login_redirect(notice: &str) -> Redirect {
    Redirect::to(&format!("{}?notice={}", LOGIN_PATH, notice))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, errors) = match self {
            AppError::Unauthenticated => {
                return login_redirect("login_required").into_response();
            }
            AppError::InvalidCredentials => {
                return login_redirect("invalid_credentials").into_response();
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                10007,
                "Validation failed".to_string(),
                Some(errors),
            ),
            AppError::DuplicateIdentity => (
                StatusCode::CONFLICT,
                10005,
                "Email or username already exists".to_string(),
                None,
            ),
            // Ownership failures are reported as 401.
            AppError::Forbidden => (StatusCode::UNAUTHORIZED, 10004, "Unauthorized".to_string(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, 10001, msg, None),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                10008,
                "Request body too large".to_string(),
                None,
            ),
            AppError::UpstreamUploadFailure(detail) => {
                tracing::error!(%detail, "Asset upload failed");
                internal()
            }
            AppError::Persistence(detail) => {
                tracing::error!(%detail, "Persistence error");
                internal()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                internal()
            }
            AppError::Redis(e) => {
                tracing::error!("Redis error: {}", e);
                internal()
            }
            AppError::Internal(detail) => {
                tracing::error!(%detail, "Internal error");
                internal()
            }
        };

        let body = ErrorResponse {
            code,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, u16, String, Option<Vec<FieldError>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        10000,
        "Server error".into(),
        None,
    )
}
