//! Rupee display and amount parsing.
//!
//! Amounts stay exact `Decimal`s everywhere; rounding to the minor unit
//! happens only here, at display time.

use rust_decimal::Decimal;
use rusty_money::{Money, iso};

/// Format a decimal amount as Indian rupees, e.g. `₹1,234.50`.
#[must_use]
pub fn inr(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::INR).to_string()
}

/// Parse a user-entered amount.
///
/// Empty or non-numeric input yields `None` so callers can fall back to a
/// computed default.
#[must_use]
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formats_with_rupee_symbol_and_minor_units() -> TestResult {
        assert_eq!(inr("1234.5".parse()?), "₹1,234.50");
        assert_eq!(inr(Decimal::ZERO), "₹0.00");

        Ok(())
    }

    #[test]
    fn parses_plain_and_fractional_amounts() -> TestResult {
        assert_eq!(parse_amount("250"), Some(Decimal::from(250)));
        assert_eq!(parse_amount(" 99.50 "), Some("99.5".parse()?));
        assert_eq!(parse_amount("0"), Some(Decimal::ZERO));

        Ok(())
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("twenty"), None);
        assert_eq!(parse_amount("12.3.4"), None);
    }
}
