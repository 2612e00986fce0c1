//! Money formatting helpers backed by decimal arithmetic.
//!
//! All monetary amounts in the POS flow through [`rust_decimal::Decimal`] so
//! that cart totals, discounts, and cash balances never accumulate binary
//! floating-point error. Display formatting always uses two decimal places,
//! matching what the receipt and the backend expect.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a decimal amount with exactly two decimal places.
///
/// Rounds half-way cases away from zero (`2.005` → `"2.01"`), which is the
/// convention cash registers use.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_string_with_scale(2)
}

/// Extension helpers on [`Decimal`] used by totals arithmetic.
pub trait DecimalExt {
    /// Clamp a discount into the valid `[0, total]` range.
    #[must_use]
    fn clamp_discount(self, total: Decimal) -> Decimal;
}

impl DecimalExt for Decimal {
    fn clamp_discount(self, total: Decimal) -> Decimal {
        if self < Decimal::ZERO {
            Decimal::ZERO
        } else if self > total {
            total
        } else {
            self
        }
    }
}

/// Internal helper: render a decimal with a fixed scale.
trait ToStringWithScale {
    fn to_string_with_scale(&self, scale: u32) -> String;
}

impl ToStringWithScale for Decimal {
    fn to_string_with_scale(&self, scale: u32) -> String {
        let mut value = *self;
        value.rescale(scale);
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_amount_pads_scale() {
        assert_eq!(format_amount(dec!(5)), "5.00");
        assert_eq!(format_amount(dec!(19.9)), "19.90");
    }

    #[test]
    fn test_format_amount_rounds_half_up() {
        assert_eq!(format_amount(dec!(2.005)), "2.01");
        assert_eq!(format_amount(dec!(2.004)), "2.00");
    }

    #[test]
    fn test_clamp_discount_negative() {
        assert_eq!(dec!(-5).clamp_discount(dec!(100)), Decimal::ZERO);
    }

    #[test]
    fn test_clamp_discount_over_total() {
        assert_eq!(dec!(150).clamp_discount(dec!(100)), dec!(100));
    }

    #[test]
    fn test_clamp_discount_in_range() {
        assert_eq!(dec!(10).clamp_discount(dec!(100)), dec!(10));
    }
}
