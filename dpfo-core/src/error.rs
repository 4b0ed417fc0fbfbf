use thiserror::Error;

use crate::models::TaxYearConfigError;
use crate::validators::{AmountError, IbanError, RodneCisloError};

/// Errors that abort a declaration computation.
///
/// All of these stem from bad input (or a bad statutory configuration), are
/// detected before or during fact derivation, and carry the field name so the
/// surrounding UI can highlight the specific input. There is no partial
/// success: a computation either yields a complete declaration or one of
/// these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxFormError {
    /// An amount field does not parse as a non-negative decimal.
    #[error("{field}: {source}")]
    MalformedAmount {
        field: String,
        #[source]
        source: AmountError,
    },

    /// A national ID (rodné číslo) failed its format or checksum checks.
    #[error("{field}: {source}")]
    InvalidNationalId {
        field: String,
        #[source]
        source: RodneCisloError,
    },

    /// A bank account identifier failed its format, country or checksum
    /// checks.
    #[error("{field}: {source}")]
    InvalidBankAccount {
        field: String,
        #[source]
        source: IbanError,
    },

    /// A month or month range is outside 1-12 or runs backwards.
    #[error("{field}: '{value}' is not a valid month range")]
    InvalidMonthRange { field: String, value: String },

    /// A section flag is set but one of its required sub-fields is absent.
    #[error("required field '{0}' is missing")]
    MissingRequiredField(String),

    /// The statutory configuration itself is unusable.
    #[error(transparent)]
    Config(#[from] TaxYearConfigError),
}

impl TaxFormError {
    pub(crate) fn malformed_amount(field: &str, source: AmountError) -> Self {
        Self::MalformedAmount {
            field: field.to_string(),
            source,
        }
    }

    pub(crate) fn invalid_national_id(field: &str, source: RodneCisloError) -> Self {
        Self::InvalidNationalId {
            field: field.to_string(),
            source,
        }
    }

    pub(crate) fn invalid_month_range(field: &str, value: impl Into<String>) -> Self {
        Self::InvalidMonthRange {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::MissingRequiredField(field.to_string())
    }
}
