//! Wire-format tolerance layer.
//!
//! The backends this terminal talks to have never agreed on a schema: lists
//! arrive bare or wrapped, entity fields go by several names
//! (`id`/`customerId`/`cid`, `price`/`unitPrice`, `qty`/`qtyOnHand`/`quantity`),
//! and numbers sometimes arrive as strings. This module deserializes all of
//! those shapes into loose DTOs and converts them to the canonical types in
//! [`super::types`]. Records without a usable identifier are dropped, exactly
//! like the old row renderers skipped them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use tillside_core::{CustomerId, ItemCode, OrderId};

use super::types::{Customer, Item, Order, OrderLine};

// =============================================================================
// List envelope
// =============================================================================

/// The three list shapes known to occur: a bare JSON array, `{"data": [...]}`
/// (older servlet backends), and `{"content": [...]}` (Spring Data pages).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
    Paged { content: Vec<T> },
}

impl<T> ListEnvelope<T> {
    /// Unwrap into the inner list, whatever the envelope was.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(list) | Self::Wrapped { data: list } | Self::Paged { content: list } => list,
        }
    }
}

// =============================================================================
// Flexible scalar deserializers
// =============================================================================

/// Accept a JSON number or a numeric string; empty strings count as absent.
fn flex_decimal_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Str(String),
    }

    let Some(raw) = Option::<Raw>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match raw {
        Raw::Int(v) => Ok(Some(Decimal::from(v))),
        Raw::Float(v) => Decimal::try_from(v)
            .map(Some)
            .map_err(serde::de::Error::custom),
        Raw::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<Decimal>()
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Accept a JSON integer, float, or numeric string; empty strings count as
/// absent. Floats are truncated, matching the old `parseInt` behavior.
fn flex_int_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Str(String),
    }

    let Some(raw) = Option::<Raw>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match raw {
        Raw::Int(v) => Ok(Some(v)),
        #[allow(clippy::cast_possible_truncation)]
        Raw::Float(v) => Ok(Some(v.trunc() as i64)),
        Raw::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Accept an ISO date, optionally with a time suffix (`2024-03-01T10:00:00Z`).
/// Unparseable dates become `None`; the table renders them blank.
fn flex_date_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let date_part = raw.get(..10).unwrap_or(&raw);
    Ok(NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok())
}

/// Treat any missing/empty string as `""` rather than an error.
fn trimmed_or_empty(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Keep an identifier only if it is present and non-blank.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// =============================================================================
// Customers
// =============================================================================

/// Loose customer record as it appears on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerWire {
    #[serde(default, alias = "customerId", alias = "cid", alias = "code")]
    pub id: Option<String>,
    #[serde(default, alias = "customerName", alias = "fullName")]
    pub name: Option<String>,
    #[serde(default, alias = "customerAddress")]
    pub address: Option<String>,
    #[serde(
        default,
        alias = "income",
        deserialize_with = "flex_decimal_opt"
    )]
    pub salary: Option<Decimal>,
}

impl CustomerWire {
    /// Convert to the canonical type; records without an ID are dropped.
    pub fn into_domain(self) -> Option<Customer> {
        let id = non_empty(self.id)?;
        Some(Customer {
            id: CustomerId::new(id),
            name: trimmed_or_empty(self.name),
            address: trimmed_or_empty(self.address),
            salary: self.salary.unwrap_or_default(),
        })
    }
}

// =============================================================================
// Items
// =============================================================================

/// Loose item record. `code` and `id` (and `unitPrice` and `price`) are kept
/// as separate fields because some backends send both at once, which would
/// trip serde's duplicate-field detection if they were aliases.
#[derive(Debug, Default, Deserialize)]
pub struct ItemWire {
    #[serde(default, alias = "itemCode", alias = "productCode", alias = "productId")]
    pub code: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "itemName", alias = "productName")]
    pub description: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(
        default,
        alias = "qtyOnHand",
        alias = "quantity",
        deserialize_with = "flex_int_opt"
    )]
    pub qty: Option<i64>,
    #[serde(
        default,
        rename = "unitPrice",
        alias = "unitPricePerQty",
        deserialize_with = "flex_decimal_opt"
    )]
    pub unit_price: Option<Decimal>,
    #[serde(default, deserialize_with = "flex_decimal_opt")]
    pub price: Option<Decimal>,
}

impl ItemWire {
    /// Convert to the canonical type; records without a code are dropped.
    /// `unitPrice` wins over `price` when both are present.
    pub fn into_domain(self) -> Option<Item> {
        let code = non_empty(self.code).or_else(|| non_empty(self.id))?;
        Some(Item {
            code: ItemCode::new(code),
            description: {
                let description = trimmed_or_empty(self.description);
                if description.is_empty() {
                    trimmed_or_empty(self.name)
                } else {
                    description
                }
            },
            qty_on_hand: self.qty.unwrap_or_default(),
            unit_price: self.unit_price.or(self.price).unwrap_or_default(),
        })
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Loose order header.
#[derive(Debug, Default, Deserialize)]
pub struct OrderWire {
    #[serde(default, alias = "orderId")]
    pub id: Option<String>,
    #[serde(default, alias = "orderDate", deserialize_with = "flex_date_opt")]
    pub date: Option<NaiveDate>,
    #[serde(default, rename = "customerId", alias = "customer")]
    pub customer_id: Option<String>,
    #[serde(
        default,
        alias = "totalAmount",
        alias = "amount",
        deserialize_with = "flex_decimal_opt"
    )]
    pub total: Option<Decimal>,
}

impl OrderWire {
    /// Convert to the canonical type; records without an ID are dropped.
    pub fn into_domain(self) -> Option<Order> {
        let id = non_empty(self.id)?;
        Some(Order {
            id: OrderId::new(id),
            date: self.date,
            customer_id: CustomerId::new(trimmed_or_empty(self.customer_id)),
            total: self.total.unwrap_or_default(),
        })
    }
}

/// Loose order detail line. `price` wins over `unitPrice` when both are
/// present, matching the old detail renderer.
#[derive(Debug, Default, Deserialize)]
pub struct OrderLineWire {
    #[serde(default, rename = "itemCode", alias = "itemId")]
    pub item_code: Option<String>,
    #[serde(default, deserialize_with = "flex_int_opt")]
    pub qty: Option<i64>,
    #[serde(default, deserialize_with = "flex_decimal_opt")]
    pub price: Option<Decimal>,
    #[serde(default, rename = "unitPrice", deserialize_with = "flex_decimal_opt")]
    pub unit_price: Option<Decimal>,
}

impl OrderLineWire {
    /// Convert to the canonical type; lines without an item code are dropped.
    pub fn into_domain(self) -> Option<OrderLine> {
        let item_code = non_empty(self.item_code)?;
        Some(OrderLine {
            item_code: ItemCode::new(item_code),
            qty: self.qty.unwrap_or_default(),
            unit_price: self.price.or(self.unit_price).unwrap_or_default(),
        })
    }
}

/// Deserialize a list response of loose records and convert the usable ones.
///
/// # Errors
///
/// Returns the underlying serde error when the body is not one of the known
/// list shapes.
pub fn parse_list<W, T>(
    body: &str,
    convert: impl Fn(W) -> Option<T>,
) -> Result<Vec<T>, serde_json::Error>
where
    W: for<'de> Deserialize<'de>,
{
    let envelope: ListEnvelope<W> = serde_json::from_str(body)?;
    Ok(envelope.into_vec().into_iter().filter_map(convert).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_envelope_bare_array() {
        let customers =
            parse_list(r#"[{"id":"C001","name":"Alice"}]"#, CustomerWire::into_domain)
                .expect("parse");
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].id, CustomerId::new("C001"));
    }

    #[test]
    fn test_envelope_wrapped_data() {
        let customers = parse_list(
            r#"{"data":[{"customerId":"C002","customerName":"Bob"}]}"#,
            CustomerWire::into_domain,
        )
        .expect("parse");
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "Bob");
    }

    #[test]
    fn test_envelope_paged_content() {
        let items = parse_list(
            r#"{"content":[{"itemCode":"I001","itemName":"Tea","qtyOnHand":12,"unitPrice":3.5}]}"#,
            ItemWire::into_domain,
        )
        .expect("parse");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].qty_on_hand, 12);
        assert_eq!(items[0].unit_price, dec!(3.5));
    }

    #[test]
    fn test_customer_aliases_and_string_salary() {
        let customers = parse_list(
            r#"[{"cid":"C003","fullName":"Carol","income":"45000"}]"#,
            CustomerWire::into_domain,
        )
        .expect("parse");
        assert_eq!(customers[0].salary, dec!(45000));
        assert_eq!(customers[0].name, "Carol");
    }

    #[test]
    fn test_records_without_id_are_dropped() {
        let customers = parse_list(
            r#"[{"name":"ghost"},{"id":"","name":"blank"},{"id":"C001","name":"ok"}]"#,
            CustomerWire::into_domain,
        )
        .expect("parse");
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "ok");
    }

    #[test]
    fn test_item_with_both_code_and_id() {
        // Some backends echo both; code must win and parsing must not error.
        let items = parse_list(
            r#"[{"code":"I001","id":"17","name":"Sugar","qty":"8","unitPrice":2.25,"price":"2.25"}]"#,
            ItemWire::into_domain,
        )
        .expect("parse");
        assert_eq!(items[0].code, ItemCode::new("I001"));
        assert_eq!(items[0].description, "Sugar");
        assert_eq!(items[0].qty_on_hand, 8);
        assert_eq!(items[0].unit_price, dec!(2.25));
    }

    #[test]
    fn test_item_falls_back_to_price_field() {
        let items = parse_list(
            r#"[{"productId":"I002","productName":"Rice","quantity":5,"price":"120.00"}]"#,
            ItemWire::into_domain,
        )
        .expect("parse");
        assert_eq!(items[0].unit_price, dec!(120.00));
        assert_eq!(items[0].description, "Rice");
    }

    #[test]
    fn test_order_date_variants() {
        let orders = parse_list(
            r#"[
                {"orderId":"D001","orderDate":"2024-03-01","customerId":"C001","total":90.0},
                {"id":"D002","date":"2024-03-02T10:15:00Z","customer":"C002","totalAmount":"12.50"},
                {"id":"D003","date":"yesterday","customerId":"C003"}
            ]"#,
            OrderWire::into_domain,
        )
        .expect("parse");

        assert_eq!(orders.len(), 3);
        assert_eq!(
            orders[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(
            orders[1].date,
            NaiveDate::from_ymd_opt(2024, 3, 2)
        );
        assert_eq!(orders[1].total, dec!(12.50));
        assert!(orders[2].date.is_none());
        assert_eq!(orders[2].total, Decimal::ZERO);
    }

    #[test]
    fn test_order_line_prefers_price_over_unit_price() {
        let lines = parse_list(
            r#"[{"itemId":"I001","qty":2,"price":"3.00","unitPrice":"9.99"}]"#,
            OrderLineWire::into_domain,
        )
        .expect("parse");
        assert_eq!(lines[0].unit_price, dec!(3.00));
        assert_eq!(lines[0].qty, 2);
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let items = parse_list(
            r#"[{"code":"I009","name":"Salt","qty":"","unitPrice":""}]"#,
            ItemWire::into_domain,
        )
        .expect("parse");
        assert_eq!(items[0].qty_on_hand, 0);
        assert_eq!(items[0].unit_price, Decimal::ZERO);
    }

    #[test]
    fn test_garbage_body_is_an_error() {
        let result = parse_list("<html>502</html>", CustomerWire::into_domain);
        assert!(result.is_err());
    }
}
