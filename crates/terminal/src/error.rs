//! Unified error handling for the terminal.
//!
//! Provides a single `AppError` type that all route handlers return. Backend
//! and internal failures are logged server-side and mapped to client-safe
//! messages before responding.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::backend::BackendError;
use crate::cart::CartError;

/// Application-level error type for the terminal.
#[derive(Debug, Error)]
pub enum AppError {
    /// POS backend operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Cart or checkout validation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Session load/save failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Backend(_) | Self::Session(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Backend(err) => match err {
                BackendError::NotFound(_) => StatusCode::NOT_FOUND,
                BackendError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Cart(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Backend(err) => match err {
                BackendError::NotFound(what) => format!("Not found: {what}"),
                BackendError::Unsupported(what) => {
                    format!("This backend does not support {what}")
                }
                _ => "Backend service error".to_string(),
            },
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Cart(err) => err.to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
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
    fn test_app_error_display() {
        let err = AppError::NotFound("order D001".to_string());
        assert_eq!(err.to_string(), "Not found: order D001");

        let err = AppError::BadRequest("Enter ID and Name".to_string());
        assert_eq!(err.to_string(), "Bad request: Enter ID and Name");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::InvalidQuantity)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_backend_error_mapping() {
        assert_eq!(
            get_status(AppError::Backend(BackendError::NotFound(
                "order D001".to_string()
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Backend(BackendError::Unsupported(
                "order placement"
            ))),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            get_status(AppError::Backend(BackendError::status(500, "boom"))),
            StatusCode::BAD_GATEWAY
        );
    }
}
