use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted account identifier after normalization.
const IBAN_MAX_LEN: usize = 29;

/// Country prefix accepted by this system.
pub const ALLOWED_COUNTRY: &str = "SK";

static IBAN_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]{1,25}$").expect("static pattern"));

/// Errors raised when a bank account identifier fails validation.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum IbanError {
    /// Wrong length or character set.
    #[error("'{0}' is not a well-formed IBAN")]
    InvalidFormat(String),

    /// The two-letter prefix names a country this system does not accept.
    #[error("IBAN country must be {expected}, got {got}")]
    UnsupportedCountry { expected: String, got: String },

    /// The ISO 13616 mod-97 check failed.
    #[error("IBAN checksum mismatch")]
    ChecksumMismatch,
}

/// Uppercases and strips all whitespace.
fn normalize_iban(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Validates a bank account identifier and returns its normalized form.
///
/// Normalizes first (uppercase, whitespace stripped), then checks shape,
/// country prefix and finally the ISO 13616 mod-97 checksum: the first four
/// characters move to the end, letters expand to two-digit numbers
/// (A=10 … Z=35), and the resulting number must leave remainder 1 modulo 97.
///
/// Pure function; validating its own output yields the same result.
///
/// # Errors
///
/// [`IbanError::InvalidFormat`], [`IbanError::UnsupportedCountry`] or
/// [`IbanError::ChecksumMismatch`], in that order of precedence.
pub fn validate_iban(s: &str, allowed_country: &str) -> Result<String, IbanError> {
    let normalized = normalize_iban(s);
    if normalized.len() > IBAN_MAX_LEN || !IBAN_SHAPE.is_match(&normalized) {
        return Err(IbanError::InvalidFormat(normalized));
    }
    if &normalized[..2] != allowed_country {
        return Err(IbanError::UnsupportedCountry {
            expected: allowed_country.to_string(),
            got: normalized[..2].to_string(),
        });
    }
    if mod97(&normalized) != 1 {
        return Err(IbanError::ChecksumMismatch);
    }
    Ok(normalized)
}

/// Remainder of the rearranged, letter-expanded identifier modulo 97,
/// computed digit by digit to avoid big-integer arithmetic.
fn mod97(normalized: &str) -> u32 {
    let rearranged = normalized[4..].chars().chain(normalized[..4].chars());
    let mut remainder: u32 = 0;
    for c in rearranged {
        if let Some(digit) = c.to_digit(10) {
            remainder = (remainder * 10 + digit) % 97;
        } else {
            let value = c as u32 - 'A' as u32 + 10;
            remainder = (remainder * 100 + value) % 97;
        }
    }
    remainder
}

/// Formatting helper for incremental typing: groups the identifier into
/// blocks of four separated by single spaces.
///
/// Not a validity gate. When the new value is shorter than the previous one
/// the user is deleting, and the input is returned untouched so the separator
/// being removed does not immediately reappear. Idempotent when re-applied to
/// its own output.
pub fn format_iban(partial: &str, previous: &str) -> String {
    if partial.len() < previous.len() {
        return partial.to_string();
    }
    let normalized = normalize_iban(partial);
    let mut formatted = String::with_capacity(normalized.len() + normalized.len() / 4);
    for (i, c) in normalized.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }
    formatted
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const VALID_SK: &str = "SK3112000000198742637541";

    #[test]
    fn accepts_valid_slovak_iban() {
        assert_eq!(
            validate_iban(VALID_SK, ALLOWED_COUNTRY),
            Ok(VALID_SK.to_string())
        );
    }

    #[test]
    fn normalizes_spacing_and_case() {
        assert_eq!(
            validate_iban("sk31 1200 0000 1987 4263 7541", ALLOWED_COUNTRY),
            Ok(VALID_SK.to_string())
        );
    }

    #[test]
    fn validation_is_idempotent_on_its_own_output() {
        let normalized = validate_iban(VALID_SK, ALLOWED_COUNTRY).unwrap();

        assert_eq!(validate_iban(&normalized, ALLOWED_COUNTRY), Ok(normalized));
    }

    #[test]
    fn rejects_bad_shape() {
        assert_eq!(
            validate_iban("SK31!200", ALLOWED_COUNTRY),
            Err(IbanError::InvalidFormat("SK31!200".to_string()))
        );
        assert_eq!(
            validate_iban("1K3112000000198742637541", ALLOWED_COUNTRY),
            Err(IbanError::InvalidFormat(
                "1K3112000000198742637541".to_string()
            ))
        );
    }

    #[test]
    fn rejects_overlong_input() {
        let too_long = format!("SK31{}", "0".repeat(30));

        assert_eq!(
            validate_iban(&too_long, ALLOWED_COUNTRY),
            Err(IbanError::InvalidFormat(too_long))
        );
    }

    #[test]
    fn rejects_foreign_country() {
        // Valid German IBAN, wrong country for this system.
        assert_eq!(
            validate_iban("DE89370400440532013000", ALLOWED_COUNTRY),
            Err(IbanError::UnsupportedCountry {
                expected: "SK".to_string(),
                got: "DE".to_string(),
            })
        );
    }

    #[test]
    fn rejects_checksum_mismatch() {
        assert_eq!(
            validate_iban("SK3112000000198742637542", ALLOWED_COUNTRY),
            Err(IbanError::ChecksumMismatch)
        );
    }

    #[test]
    fn format_groups_by_four() {
        assert_eq!(
            format_iban(VALID_SK, ""),
            "SK31 1200 0000 1987 4263 7541"
        );
    }

    #[test]
    fn format_is_idempotent() {
        let once = format_iban(VALID_SK, "");
        let twice = format_iban(&once, &once[..once.len() - 1]);

        assert_eq!(once, twice);
    }

    #[test]
    fn format_leaves_deletions_alone() {
        // User just deleted the trailing space; do not re-append it.
        assert_eq!(format_iban("SK31 1200", "SK31 1200 "), "SK31 1200");
    }

    #[test]
    fn format_does_not_change_validity() {
        let formatted = format_iban(VALID_SK, "");

        assert!(validate_iban(&formatted, ALLOWED_COUNTRY).is_ok());
    }
}
