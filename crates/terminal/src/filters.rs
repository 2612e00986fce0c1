//! Custom Askama template filters.

use std::fmt::Display;

use rust_decimal::Decimal;

use tillside_core::format_amount;

/// Format a monetary value with two decimal places.
///
/// Accepts anything that displays as a decimal number; values that do not
/// parse are passed through unchanged rather than breaking the page.
///
/// Usage in templates: `{{ item.unit_price|money }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(&value.to_string()))
}

/// Zero-pad a count to at least two digits, dashboard style (`7` -> `07`).
///
/// Usage in templates: `{{ counts.customers|pad2 }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn pad2(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_padded(&value.to_string()))
}

fn format_money(raw: &str) -> String {
    match raw.trim().parse::<Decimal>() {
        Ok(amount) => format_amount(amount),
        Err(_) => raw.to_string(),
    }
}

fn format_padded(raw: &str) -> String {
    format!("{raw:0>2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("5"), "5.00");
        assert_eq!(format_money("19.9"), "19.90");
        assert_eq!(format_money("19.999"), "20.00");
        assert_eq!(format_money("not a number"), "not a number");
    }

    #[test]
    fn test_format_padded() {
        assert_eq!(format_padded("7"), "07");
        assert_eq!(format_padded("42"), "42");
        assert_eq!(format_padded("100"), "100");
        assert_eq!(format_padded("0"), "00");
    }
}
