//! Unified error handling
//!
//! Application-level error enum and response envelope:
//! - [`AppError`] - error taxonomy, mapped to status/message pairs
//! - [`AppResponse`] - API response structure
//!
//! # Error code scheme
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E3xxx  | Authentication | E3001 not logged in |
//! | E0xxx  | Business logic | E0003 not found |
//! | E9xxx  | System | E9002 database error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::auth::JwtError;
use crate::db::repository::RepoError;

/// Application-level Result type, used in HTTP handlers and services
pub type AppResult<T> = Result<T, AppError>;

/// Unified API response envelope
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 means success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication errors (401) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    // ========== Business logic errors (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    // ========== System errors (5xx) ==========
    #[error("Store operation timed out: {0}")]
    UpstreamTimeout(String),

    #[error("Aggregation failed: {0}")]
    AggregateFailed(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Please login first"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", "Invalid token"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", "Token expired"),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),

            // Invalid request (400)
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.as_str()),

            // Store timeout (504)
            AppError::UpstreamTimeout(msg) => {
                error!(target: "database", error = %msg, "Store operation timed out");
                (StatusCode::GATEWAY_TIMEOUT, "E9003", "Store operation timed out")
            }

            // Aggregation errors (500)
            AppError::AggregateFailed(msg) => {
                error!(target: "database", error = %msg, "Aggregation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9004", "Aggregation failed")
            }

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn aggregate_failed(msg: impl Into<String>) -> Self {
        Self::AggregateFailed(msg.into())
    }

    /// Unified credentials error, used on login to prevent account enumeration
    pub fn invalid_credentials() -> Self {
        Self::Invalid("Invalid email or password".to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Timeout(op) => AppError::UpstreamTimeout(op.to_string()),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<JwtError> for AppError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::ExpiredToken => AppError::TokenExpired,
            JwtError::InvalidSignature | JwtError::InvalidToken(_) => AppError::InvalidToken,
            JwtError::GenerationFailed(msg) => AppError::Internal(msg),
            JwtError::KeyGenerationFailed(msg) | JwtError::ConfigError(msg) => {
                AppError::Internal(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::TokenExpired, StatusCode::UNAUTHORIZED),
            (AppError::not_found("x"), StatusCode::NOT_FOUND),
            (AppError::conflict("x"), StatusCode::CONFLICT),
            (AppError::validation("x"), StatusCode::BAD_REQUEST),
            (
                AppError::UpstreamTimeout("read".into()),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                AppError::aggregate_failed("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_repo_error_conversion() {
        let err: AppError = RepoError::Duplicate("email".into()).into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = RepoError::Timeout("aggregate").into();
        assert!(matches!(err, AppError::UpstreamTimeout(_)));
    }

    #[test]
    fn test_envelope_shape() {
        let body = AppResponse::<()> {
            code: "E0003".to_string(),
            message: "Table 42 not found".to_string(),
            data: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"code": "E0003", "message": "Table 42 not found"})
        );
    }

    #[test]
    fn test_credentials_error_is_generic() {
        let err = AppError::invalid_credentials();
        assert_eq!(err.to_string(), "Invalid request: Invalid email or password");
    }
}
