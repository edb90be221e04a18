//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Client-facing messages come from the Vietnamese
//! catalog in `gearshop_core::messages`; internal details are never leaked.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use gearshop_core::messages;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate key or conflicting state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request was well-formed but violates a domain rule
    /// (e.g. an illegal order status transition).
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    /// Missing or invalid credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    const fn status(&self) -> StatusCode {
        match self {
            // Row-level misses from repositories surface as a plain 404.
            Self::Database(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => err.status(),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Stable machine-readable code for the front end.
    const fn code(&self) -> &'static str {
        match self {
            Self::Database(RepositoryError::NotFound) => "not_found",
            Self::Database(RepositoryError::Conflict(_)) => "conflict",
            Self::Database(_) | Self::Internal(_) => "internal",
            Self::Auth(err) => err.code(),
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::BadRequest(_) => "bad_request",
            Self::Unprocessable(_) => "unprocessable",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
        }
    }

    /// The Vietnamese message shown to the client.
    fn message(&self) -> String {
        match self {
            Self::Internal(_) => messages::INTERNAL.to_string(),
            Self::Database(err) => match err {
                RepositoryError::NotFound => messages::NOT_FOUND.to_string(),
                RepositoryError::Conflict(m) => m.clone(),
                RepositoryError::Database(sqlx::Error::PoolTimedOut) => {
                    messages::DB_UNAVAILABLE.to_string()
                }
                _ => messages::INTERNAL.to_string(),
            },
            Self::Auth(err) => err.user_message().to_string(),
            Self::NotFound(m)
            | Self::Conflict(m)
            | Self::BadRequest(m)
            | Self::Unprocessable(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m) => m.clone(),
        }
    }
}

/// JSON error body: `{ "error": { "code": ..., "message": ... } }`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_)
            ) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.message(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn status_codes_match_error_classes() {
        assert_eq!(
            get_status(AppError::not_found(messages::PRODUCT_NOT_FOUND)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::conflict(messages::PRODUCT_CODE_TAKEN)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::bad_request(messages::PRICE_NOT_POSITIVE)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::unprocessable(messages::ORDER_STATUS_INVALID)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::unauthorized(messages::LOGIN_REQUIRED)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::forbidden(messages::FORBIDDEN)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn repository_errors_map_by_kind() {
        assert_eq!(
            get_status(AppError::from(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::from(RepositoryError::Conflict(
                messages::EMAIL_TAKEN.to_string()
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::from(RepositoryError::DataCorruption(
                "bad status".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::Internal("connection refused at 10.0.0.3".to_string());
        assert_eq!(err.message(), messages::INTERNAL);
    }
}
