//! Health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Liveness check. Always succeeds while the process is up.
pub async fn health() -> &'static str {
    "OK"
}

/// Readiness check. Verifies the POS backend is reachable.
pub async fn ready(State(state): State<AppState>) -> Response {
    match state.backend().ping().await {
        Ok(()) => (StatusCode::OK, "READY").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Backend unreachable").into_response()
        }
    }
}
