//! Canonical domain types for the POS backend.
//!
//! These are the single schema the rest of the terminal sees. The old
//! front-end guessed field names at every call site (`c.id || c.customerId ||
//! c.cid`); here that guessing happens exactly once, in [`super::wire`], and
//! everything downstream works with these explicit types.
//!
//! Monetary fields are `rust_decimal::Decimal` and serialize as decimal
//! strings, preserving precision on the wire.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tillside_core::{CustomerId, ItemCode, OrderId};

/// A customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    /// Monthly salary/income; the backend historically calls this either
    /// `salary` or `income`.
    #[serde(default)]
    pub salary: Decimal,
}

/// A stock item (the backend exposes these under `/api/products`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub code: ItemCode,
    pub description: String,
    #[serde(default)]
    pub qty_on_hand: i64,
    #[serde(default)]
    pub unit_price: Decimal,
}

/// An order header as listed by `GET /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Missing or unparseable dates are preserved as `None` and rendered
    /// blank, the way the old table did.
    pub date: Option<NaiveDate>,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub total: Decimal,
}

/// One detail line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_code: ItemCode,
    pub qty: i64,
    pub unit_price: Decimal,
}

impl OrderLine {
    /// Line total (`qty × unitPrice`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.qty)
    }
}

/// The composed payload posted on purchase (`POST /api/orders`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub order_id: OrderId,
    pub order_date: NaiveDate,
    pub customer_id: CustomerId,
    /// Discounted subtotal, the amount the customer actually pays.
    pub total: Decimal,
    pub order_details: Vec<OrderLine>,
}

/// Entity counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub customers: usize,
    pub items: usize,
    pub orders: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_line_total() {
        let line = OrderLine {
            item_code: ItemCode::new("I001"),
            qty: 3,
            unit_price: dec!(19.90),
        };
        assert_eq!(line.line_total(), dec!(59.70));
    }

    #[test]
    fn test_new_order_serializes_canonical_camel_case() {
        let order = NewOrder {
            order_id: OrderId::new("D001"),
            order_date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            customer_id: CustomerId::new("C001"),
            total: dec!(90.00),
            order_details: vec![OrderLine {
                item_code: ItemCode::new("I001"),
                qty: 2,
                unit_price: dec!(45.00),
            }],
        };

        let json = serde_json::to_value(&order).expect("serialize");
        assert_eq!(json["orderId"], "D001");
        assert_eq!(json["orderDate"], "2024-03-01");
        assert_eq!(json["customerId"], "C001");
        assert_eq!(json["total"], "90.00");
        assert_eq!(json["orderDetails"][0]["itemCode"], "I001");
        assert_eq!(json["orderDetails"][0]["qty"], 2);
        assert_eq!(json["orderDetails"][0]["unitPrice"], "45.00");
    }

    #[test]
    fn test_customer_round_trip() {
        let customer = Customer {
            id: CustomerId::new("C001"),
            name: "Alice".to_string(),
            address: "12 High St".to_string(),
            salary: dec!(45000),
        };

        let json = serde_json::to_string(&customer).expect("serialize");
        let back: Customer = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, customer);
    }
}
