//! Tillside terminal - point-of-sale front end.
//!
//! This binary serves the operator-facing terminal UI.
//!
//! # Architecture
//!
//! - Axum web framework with HTMX for interactivity
//! - Askama templates for server-side rendering
//! - A typed client for the POS backend REST API (customers, items, orders)
//! - Session-stored cart for the purchase flow; the backend stays the single
//!   source of truth for everything else

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tillside_terminal::config::TerminalConfig;
use tillside_terminal::middleware::{create_session_layer, request_id_middleware};
use tillside_terminal::routes;
use tillside_terminal::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = TerminalConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tillside_terminal=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        backend = %config.backend.base_url,
        flavor = ?config.backend.flavor,
        "Backend configured"
    );

    // Build application state
    let state = AppState::new(config.clone());

    // Create session layer (in-memory; carts do not outlive the process)
    let session_layer = create_session_layer();

    // Build router
    let app = Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("terminal listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
