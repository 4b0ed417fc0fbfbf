//! Checksum and format validation for user-supplied identifiers and amounts.
//!
//! Everything past this boundary works on typed values: the eligibility
//! resolver and the computation engine never see raw locale-formatted
//! strings.

mod amount;
mod iban;
mod rodne_cislo;

pub use amount::{AmountError, parse_amount, parse_amount_or_zero};
pub use iban::{ALLOWED_COUNTRY, IbanError, format_iban, validate_iban};
pub use rodne_cislo::{RodneCislo, RodneCisloError, Sex};
