//! Dashboard route handlers.
//!
//! The landing page shows the entity count badges, a quick customer entry
//! form, and the most recent orders. The badges are also served standalone
//! as an HTMX fragment so mutations elsewhere can refresh them.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::backend::Counts;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::customers::CustomerRow;
use super::orders::OrderRow;

/// Number of recent orders shown on the dashboard.
const RECENT_ORDERS: usize = 5;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub counts: Counts,
    pub customers: Vec<CustomerRow>,
    pub recent_orders: Vec<OrderRow>,
}

/// Count badges fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/counts.html")]
pub struct CountsTemplate {
    pub counts: Counts,
}

/// Display the dashboard.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<DashboardTemplate> {
    let backend = state.backend();
    let (customers, orders) = tokio::try_join!(backend.list_customers(), backend.list_orders())?;
    let items = backend.list_items().await?;

    let counts = Counts {
        customers: customers.len(),
        items: items.len(),
        orders: orders.len(),
    };

    // Newest orders come last in the listing.
    let recent_orders = orders.iter().rev().take(RECENT_ORDERS).map(OrderRow::from).collect();

    Ok(DashboardTemplate {
        counts,
        customers: customers.iter().map(CustomerRow::from).collect(),
        recent_orders,
    })
}

/// Serve the count badges fragment (HTMX).
#[instrument(skip(state))]
pub async fn counts(State(state): State<AppState>) -> Result<CountsTemplate> {
    let counts = state.backend().counts().await?;
    Ok(CountsTemplate { counts })
}
