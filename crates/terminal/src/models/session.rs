//! Session-stored state.
//!
//! The only thing the terminal keeps between requests is the in-progress
//! cart. These helpers wrap the tower-sessions API so handlers never deal
//! with raw session keys.

use tower_sessions::Session;

use crate::cart::Cart;
use crate::error::AppError;

/// Session keys.
pub mod keys {
    /// Key for the in-progress purchase cart.
    pub const CART: &str = "cart";
}

/// Load the cart from the session, defaulting to an empty one.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart, AppError> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Persist the cart back into the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), AppError> {
    session.insert(keys::CART, cart).await?;
    Ok(())
}

/// Drop the cart from the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_cart(session: &Session) -> Result<(), AppError> {
    session.remove::<Cart>(keys::CART).await?;
    Ok(())
}
