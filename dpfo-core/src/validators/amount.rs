use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a user-supplied amount string cannot be used.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountError {
    /// The string is empty or not a number at all.
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// Monetary inputs must not be negative.
    #[error("amount must not be negative, got {0}")]
    Negative(Decimal),
}

/// Normalizes Slovak-locale numeric input: trims, strips grouping spaces
/// (including non-breaking ones) and turns the decimal comma into a period.
fn normalize_amount_input(s: &str) -> String {
    s.trim()
        .replace([' ', '\u{a0}'], "")
        .replace(',', ".")
}

/// Parses a locale-formatted amount string into a non-negative [`Decimal`]
/// with cent precision.
///
/// Accepts both the comma and the period as decimal marker and spaces as
/// digit grouping (`"1 234,56"` and `"1234.56"` both parse to `1234.56`).
/// Sub-cent digits are rounded half-up to the nearest cent, never silently
/// truncated.
///
/// # Errors
///
/// [`AmountError::NotANumber`] for empty or non-numeric input,
/// [`AmountError::Negative`] for values below zero.
pub fn parse_amount(s: &str) -> Result<Decimal, AmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Err(AmountError::NotANumber(s.to_string()));
    }
    let value: Decimal = normalized
        .parse()
        .map_err(|_| AmountError::NotANumber(s.to_string()))?;
    if value < Decimal::ZERO {
        return Err(AmountError::Negative(value));
    }
    Ok(value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Parses an optional amount field, treating absence and blank input as zero.
///
/// Sections such as employment default their sub-amounts to zero when the
/// field was never filled in; a present but malformed value is still an error.
pub fn parse_amount_or_zero(s: Option<&str>) -> Result<Decimal, AmountError> {
    match s {
        None => Ok(Decimal::ZERO),
        Some(raw) if raw.trim().is_empty() => Ok(Decimal::ZERO),
        Some(raw) => parse_amount(raw),
    }
}
