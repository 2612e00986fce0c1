//! Backend diagnostics: reachability and entity counts.

use tracing::info;

/// Ping the configured backend.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the backend is unreachable.
pub async fn ping() -> Result<(), Box<dyn std::error::Error>> {
    let client = super::backend_client()?;

    client.ping().await?;
    info!("Backend is reachable");

    Ok(())
}

/// Print entity counts for the configured backend.
///
/// # Errors
///
/// Returns an error if configuration is invalid or any list fetch fails.
pub async fn counts() -> Result<(), Box<dyn std::error::Error>> {
    let client = super::backend_client()?;

    let counts = client.counts().await?;
    info!("Customers: {}", counts.customers);
    info!("Items:     {}", counts.items);
    info!("Orders:    {}", counts.orders);

    Ok(())
}
