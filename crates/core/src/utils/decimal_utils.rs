use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::{DECIMAL_PRECISION, QUANTITY_THRESHOLD};

/// Parses a decimal constant, falling back to `default` if it is malformed.
pub fn decimal_constant(value: &str, default: Decimal) -> Decimal {
    value.parse::<Decimal>().unwrap_or(default)
}

pub fn quantity_threshold() -> Decimal {
    decimal_constant(QUANTITY_THRESHOLD, Decimal::new(1, 8))
}

pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    quantity.abs() >= quantity_threshold()
}

/// Rounds a monetary value to the engine's valuation precision.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp(DECIMAL_PRECISION)
}

/// `part / whole * 100`, or zero when `whole` is not positive.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole * dec!(100)
    } else {
        Decimal::ZERO
    }
}

/// Divides, returning `None` on a zero divisor.
pub fn checked_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        None
    } else {
        numerator.checked_div(denominator)
    }
}
