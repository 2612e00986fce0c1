//! The purchase cart and its money math.
//!
//! The cart lives in the operator's session and is rebuilt from scratch for
//! every purchase. All monetary arithmetic is `Decimal`; nothing here touches
//! floats.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tillside_core::{DecimalExt, ItemCode};

use crate::backend::{Item, OrderLine};

/// Validation failures for cart operations and checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantity must be a positive integer.
    #[error("Invalid quantity")]
    InvalidQuantity,

    /// Requested more than the backend says is on hand.
    #[error("Not enough stock (only {available} available)")]
    InsufficientStock { available: i64 },

    /// Checkout with nothing in the cart.
    #[error("Cart is empty")]
    Empty,

    /// Tendered cash does not cover the discounted subtotal.
    #[error("Cash is not enough")]
    CashShort,

    /// Checkout without a selected customer.
    #[error("Select a customer")]
    MissingCustomer,

    /// Checkout without an order date.
    #[error("Select an order date")]
    MissingDate,
}

/// One line of the in-progress cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_code: ItemCode,
    pub description: String,
    pub qty: i64,
    pub unit_price: Decimal,
}

impl CartLine {
    /// Line total (`qty × unitPrice`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.qty)
    }
}

/// The in-progress purchase, stored in the session between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity of `code` already in the cart.
    #[must_use]
    pub fn qty_of(&self, code: &ItemCode) -> i64 {
        self.lines
            .iter()
            .filter(|line| &line.item_code == code)
            .map(|line| line.qty)
            .sum()
    }

    /// Stock still available for `item` after what the cart already holds.
    #[must_use]
    pub fn remaining_stock(&self, item: &Item) -> i64 {
        item.qty_on_hand - self.qty_of(&item.code)
    }

    /// Add `qty` units of `item`, merging with an existing line for the same
    /// code. Stock is checked against the combined quantity, so repeatedly
    /// adding the same item cannot oversell.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a non-positive quantity and
    /// [`CartError::InsufficientStock`] when the combined quantity exceeds
    /// what is on hand.
    pub fn add_item(&mut self, item: &Item, qty: i64) -> Result<(), CartError> {
        if qty <= 0 {
            return Err(CartError::InvalidQuantity);
        }

        let in_cart = self.qty_of(&item.code);
        if in_cart + qty > item.qty_on_hand {
            return Err(CartError::InsufficientStock {
                available: item.qty_on_hand - in_cart,
            });
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.item_code == item.code)
        {
            line.qty += qty;
            // Keep the price the backend currently quotes.
            line.unit_price = item.unit_price;
        } else {
            self.lines.push(CartLine {
                item_code: item.code.clone(),
                description: item.description.clone(),
                qty,
                unit_price: item.unit_price,
            });
        }

        Ok(())
    }

    /// Remove the line for `code`, if present.
    pub fn remove_item(&mut self, code: &ItemCode) {
        self.lines.retain(|line| &line.item_code != code);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line totals before any discount.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Compute the tender summary for the current cart contents.
    ///
    /// The discount is clamped into `[0, total]`, so the subtotal can never
    /// go negative. A balance is only shown once the cash covers the
    /// subtotal; until then `cash_short` is set.
    #[must_use]
    pub fn totals(&self, discount: Decimal, cash: Option<Decimal>) -> Totals {
        let total = self.total();
        let discount = discount.clamp_discount(total);
        let subtotal = total - discount;

        let (balance, cash_short) = match cash {
            Some(cash) if cash < subtotal => (None, true),
            Some(cash) => (Some(cash - subtotal), false),
            None => (None, false),
        };

        Totals {
            total,
            discount,
            subtotal,
            cash,
            balance,
            cash_short,
        }
    }

    /// Convert the cart into order detail lines, consuming it.
    #[must_use]
    pub fn into_order_lines(self) -> Vec<OrderLine> {
        self.lines
            .into_iter()
            .map(|line| OrderLine {
                item_code: line.item_code,
                qty: line.qty,
                unit_price: line.unit_price,
            })
            .collect()
    }
}

/// Tender summary derived from the cart plus operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of line totals before discount.
    pub total: Decimal,
    /// Discount after clamping into `[0, total]`.
    pub discount: Decimal,
    /// Amount the customer actually pays.
    pub subtotal: Decimal,
    /// Cash tendered, if entered.
    pub cash: Option<Decimal>,
    /// Change due; `None` until cash covers the subtotal.
    pub balance: Option<Decimal>,
    /// Cash was entered but does not cover the subtotal.
    pub cash_short: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(code: &str, qty_on_hand: i64, unit_price: Decimal) -> Item {
        Item {
            code: ItemCode::new(code),
            description: format!("Item {code}"),
            qty_on_hand,
            unit_price,
        }
    }

    #[test]
    fn test_add_rejects_non_positive_qty() {
        let mut cart = Cart::default();
        let item = item("I001", 10, dec!(5.00));

        assert_eq!(cart.add_item(&item, 0), Err(CartError::InvalidQuantity));
        assert_eq!(cart.add_item(&item, -3), Err(CartError::InvalidQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_checks_stock_against_cart_contents() {
        let mut cart = Cart::default();
        let item = item("I001", 5, dec!(5.00));

        cart.add_item(&item, 3).unwrap();
        assert_eq!(
            cart.add_item(&item, 3),
            Err(CartError::InsufficientStock { available: 2 })
        );
        // The failed add must not have changed the cart.
        assert_eq!(cart.qty_of(&item.code), 3);
        assert_eq!(cart.remaining_stock(&item), 2);
    }

    #[test]
    fn test_add_merges_lines_for_same_item() {
        let mut cart = Cart::default();
        let item = item("I001", 10, dec!(5.00));

        cart.add_item(&item, 2).unwrap();
        cart.add_item(&item, 3).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].qty, 5);
        assert_eq!(cart.total(), dec!(25.00));
    }

    #[test]
    fn test_totals_applies_discount() {
        let mut cart = Cart::default();
        cart.add_item(&item("I001", 10, dec!(50.00)), 2).unwrap();

        let totals = cart.totals(dec!(10), None);
        assert_eq!(totals.total, dec!(100.00));
        assert_eq!(totals.discount, dec!(10));
        assert_eq!(totals.subtotal, dec!(90.00));
        assert_eq!(totals.balance, None);
        assert!(!totals.cash_short);
    }

    #[test]
    fn test_totals_clamps_discount() {
        let mut cart = Cart::default();
        cart.add_item(&item("I001", 10, dec!(50.00)), 2).unwrap();

        let over = cart.totals(dec!(150), None);
        assert_eq!(over.discount, dec!(100.00));
        assert_eq!(over.subtotal, dec!(0.00));

        let negative = cart.totals(dec!(-5), None);
        assert_eq!(negative.discount, dec!(0));
        assert_eq!(negative.subtotal, dec!(100.00));
    }

    #[test]
    fn test_totals_balance_and_cash_short() {
        let mut cart = Cart::default();
        cart.add_item(&item("I001", 10, dec!(50.00)), 2).unwrap();

        let short = cart.totals(dec!(10), Some(dec!(80)));
        assert!(short.cash_short);
        assert_eq!(short.balance, None);

        let covered = cart.totals(dec!(10), Some(dec!(95.00)));
        assert!(!covered.cash_short);
        assert_eq!(covered.balance, Some(dec!(5.00)));
    }

    #[test]
    fn test_into_order_lines() {
        let mut cart = Cart::default();
        cart.add_item(&item("I001", 10, dec!(5.00)), 2).unwrap();
        cart.add_item(&item("I002", 10, dec!(7.50)), 1).unwrap();

        let lines = cart.into_order_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item_code.as_str(), "I001");
        assert_eq!(lines[0].qty, 2);
        assert_eq!(lines[1].line_total(), dec!(7.50));
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::default();
        cart.add_item(&item("I001", 10, dec!(5.00)), 2).unwrap();
        cart.add_item(&item("I002", 10, dec!(7.50)), 1).unwrap();

        cart.remove_item(&ItemCode::new("I001"));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].item_code.as_str(), "I002");
    }
}
