//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::PosClient;
use crate::config::TerminalConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// terminal configuration and the backend client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: TerminalConfig,
    backend: PosClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: TerminalConfig) -> Self {
        let backend = PosClient::new(&config.backend);

        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    /// Get a reference to the terminal configuration.
    #[must_use]
    pub fn config(&self) -> &TerminalConfig {
        &self.inner.config
    }

    /// Get a reference to the POS backend client.
    #[must_use]
    pub fn backend(&self) -> &PosClient {
        &self.inner.backend
    }
}
