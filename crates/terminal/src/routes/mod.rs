//! HTTP route handlers for the terminal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Dashboard (counts, quick customer entry, recent orders)
//! GET  /counts                 - Entity count badges (HTMX fragment)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the backend)
//!
//! # Customers
//! GET  /customers              - Customer listing + entry form
//! GET  /customers/rows         - Customer table rows (HTMX fragment)
//! POST /customers              - Save (upsert) a customer
//! POST /customers/{id}/delete  - Delete a customer
//!
//! # Items
//! GET  /items                  - Item listing + entry form (?edit=CODE stages the edit form)
//! GET  /items/rows             - Item table rows (HTMX fragment)
//! POST /items                  - Create an item
//! POST /items/{code}/update    - Update an item
//! POST /items/{code}/delete    - Delete an item
//!
//! # Orders
//! GET  /orders                 - Order history
//! GET  /orders/{id}/lines      - Detail lines of one order (HTMX fragment)
//!
//! # Purchase (HTMX fragments)
//! GET  /purchase               - Purchase composer page
//! GET  /purchase/customer?customer_id= - Selected-customer details (fragment)
//! GET  /purchase/item?item_code=       - Selected-item details with remaining stock (fragment)
//! POST /purchase/cart          - Add an item to the cart (returns cart fragment)
//! POST /purchase/cart/{code}/remove - Remove one cart line (fragment)
//! POST /purchase/cart/clear    - Empty the cart (fragment)
//! POST /purchase/totals        - Recompute tender summary (fragment)
//! POST /purchase               - Place the order
//! ```

pub mod customers;
pub mod dashboard;
pub mod health;
pub mod items;
pub mod orders;
pub mod purchase;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Encode a flash message for use as a query-string value.
pub(crate) fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index).post(customers::save))
        .route("/rows", get(customers::rows))
        .route("/{id}/delete", post(customers::delete))
}

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(items::index).post(items::create))
        .route("/rows", get(items::rows))
        .route("/{code}/update", post(items::update))
        .route("/{code}/delete", post(items::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}/lines", get(orders::lines))
}

/// Create the purchase routes router.
pub fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(purchase::show).post(purchase::place))
        .route("/customer", get(purchase::customer_details))
        .route("/item", get(purchase::item_details))
        .route("/cart", post(purchase::add_to_cart))
        .route("/cart/{code}/remove", post(purchase::remove_from_cart))
        .route("/cart/clear", post(purchase::clear_cart))
        .route("/totals", post(purchase::totals))
}

/// Create all routes for the terminal.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Dashboard
        .route("/", get(dashboard::home))
        .route("/counts", get(dashboard::counts))
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        // Entity routes
        .nest("/customers", customer_routes())
        .nest("/items", item_routes())
        .nest("/orders", order_routes())
        .nest("/purchase", purchase_routes())
}
