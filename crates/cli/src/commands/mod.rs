//! CLI command implementations.

pub mod seed;
pub mod status;

use tillside_terminal::backend::PosClient;
use tillside_terminal::config::TerminalConfig;

/// Build a backend client from the same environment the terminal uses.
pub(crate) fn backend_client() -> Result<PosClient, Box<dyn std::error::Error>> {
    let config = TerminalConfig::from_env()?;
    tracing::info!(
        backend = %config.backend.base_url,
        flavor = ?config.backend.flavor,
        "Backend configured"
    );
    Ok(PosClient::new(&config.backend))
}
