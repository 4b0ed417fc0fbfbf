//! Shared arithmetic helpers for the statutory computations.

use rust_decimal::Decimal;

/// Rounds a value to cents using half-up rounding (away from zero at the
/// midpoint), the statutory rounding mode for every declared output field.
///
/// Intermediate results keep their exact precision; this is applied only at
/// output-field boundaries so rounding error never compounds.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use dpfo_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(3697.2404)), dec!(3697.24));
/// assert_eq!(round_half_up(dec!(0.005)), dec!(0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Floors a value at zero.
///
/// Statutory subtractions are total: a deduction can never push the base it
/// offsets below zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use dpfo_core::calculations::common::floor_zero;
///
/// assert_eq!(floor_zero(dec!(-12.50)), dec!(0));
/// assert_eq!(floor_zero(dec!(12.50)), dec!(12.50));
/// ```
pub fn floor_zero(value: Decimal) -> Decimal {
    if value < Decimal::ZERO {
        Decimal::ZERO
    } else {
        value
    }
}
