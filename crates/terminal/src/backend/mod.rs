//! Typed client for the POS backend REST API.
//!
//! # Architecture
//!
//! - One [`PosClient`] replaces every ad-hoc call site that used to talk to
//!   the backend independently; URL construction lives in one place and is
//!   unit-tested for both backend conventions.
//! - The backend is the source of truth - no local sync. Customer and item
//!   lists are cached in-memory via `moka` with a short TTL and invalidated
//!   on every mutation; orders are always re-fetched.
//! - Response-shape drift (bare array vs. `{data:[...]}` vs. `{content:[...]}`,
//!   aliased field names, stringly-typed numbers) is absorbed in [`wire`];
//!   everything past that boundary is a canonical domain type.
//!
//! # Example
//!
//! ```rust,ignore
//! use tillside_terminal::backend::PosClient;
//!
//! let client = PosClient::new(&config.backend);
//!
//! let items = client.list_items().await?;
//! client.place_order(&new_order).await?;
//! ```

mod cache;
mod client;
pub mod types;
pub mod wire;

pub use client::PosClient;
pub use types::*;

use thiserror::Error;

/// Maximum response-body length echoed back in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Errors that can occur when talking to the POS backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status code.
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built from the configured origin.
    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The configured backend flavor has no endpoint for this operation.
    #[error("Operation not supported by this backend flavor: {0}")]
    Unsupported(&'static str),
}

impl BackendError {
    /// Build a [`BackendError::Status`] from a status code and raw body,
    /// trimming the body so error messages stay log-friendly.
    #[must_use]
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::NotFound("order D001".to_string());
        assert_eq!(err.to_string(), "Not found: order D001");

        let err = BackendError::Unsupported("order details");
        assert_eq!(
            err.to_string(),
            "Operation not supported by this backend flavor: order details"
        );
    }

    #[test]
    fn test_status_error_trims_body() {
        let long_body = "x".repeat(1000);
        let err = BackendError::status(500, &long_body);
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body.len(), 200);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
