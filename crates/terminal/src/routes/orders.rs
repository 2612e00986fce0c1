//! Order history route handlers.
//!
//! Orders are read-only here; they are created through the purchase flow.
//! The detail lines of a row load lazily as an HTMX fragment.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use rust_decimal::Decimal;
use tracing::instrument;

use tillside_core::{OrderId, format_amount};

use crate::backend::{Order, OrderLine};
use crate::error::Result;
use crate::state::AppState;

/// Order header display data for templates.
#[derive(Clone)]
pub struct OrderRow {
    pub id: String,
    pub date: String,
    pub customer_id: String,
    pub total: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_str().to_string(),
            date: order
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            customer_id: order.customer_id.as_str().to_string(),
            total: format_amount(order.total),
        }
    }
}

/// Order detail line display data for templates.
#[derive(Clone)]
pub struct OrderLineRow {
    pub item_code: String,
    pub qty: i64,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&OrderLine> for OrderLineRow {
    fn from(line: &OrderLine) -> Self {
        Self {
            item_code: line.item_code.as_str().to_string(),
            qty: line.qty,
            unit_price: format_amount(line.unit_price),
            line_total: format_amount(line.line_total()),
        }
    }
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderRow>,
}

/// Order detail lines fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_lines.html")]
pub struct OrderLinesTemplate {
    pub order_id: String,
    pub lines: Vec<OrderLineRow>,
    pub total: String,
}

/// Display the order history.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<OrdersTemplate> {
    let orders = state.backend().list_orders().await?;

    Ok(OrdersTemplate {
        orders: orders.iter().map(OrderRow::from).collect(),
    })
}

/// Fetch the detail lines of one order (HTMX).
#[instrument(skip(state))]
pub async fn lines(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<OrderLinesTemplate> {
    let id = OrderId::new(id);
    let lines = state.backend().order_details(&id).await?;
    let total: Decimal = lines.iter().map(OrderLine::line_total).sum();

    Ok(OrderLinesTemplate {
        order_id: id.as_str().to_string(),
        lines: lines.iter().map(OrderLineRow::from).collect(),
        total: format_amount(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tillside_core::{CustomerId, ItemCode};

    #[test]
    fn test_order_row_formats_fields() {
        let order = Order {
            id: OrderId::new("D001"),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            customer_id: CustomerId::new("C001"),
            total: dec!(90),
        };
        let row = OrderRow::from(&order);
        assert_eq!(row.date, "2024-03-01");
        assert_eq!(row.total, "90.00");
    }

    #[test]
    fn test_order_row_renders_missing_date_blank() {
        let order = Order {
            id: OrderId::new("D002"),
            date: None,
            customer_id: CustomerId::new("C001"),
            total: dec!(10),
        };
        assert_eq!(OrderRow::from(&order).date, "");
    }

    #[test]
    fn test_order_rows_encode_detail_urls() {
        let order = Order {
            id: OrderId::new("D 1/x"),
            date: None,
            customer_id: CustomerId::new("C001"),
            total: dec!(10),
        };
        let rendered = OrdersTemplate {
            orders: vec![OrderRow::from(&order)],
        }
        .render()
        .expect("render");

        assert!(rendered.contains("/orders/D%201%2Fx/lines"));
    }

    #[test]
    fn test_order_line_row_computes_line_total() {
        let line = OrderLine {
            item_code: ItemCode::new("I001"),
            qty: 3,
            unit_price: dec!(19.90),
        };
        let row = OrderLineRow::from(&line);
        assert_eq!(row.unit_price, "19.90");
        assert_eq!(row.line_total, "59.70");
    }
}
