use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a statutory configuration fails validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxYearConfigError {
    /// A rate field must lie in [0, 1].
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    /// An amount field must be non-negative.
    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },
}

/// Statutory constants for one tax year.
///
/// Every threshold, ceiling and rate the computation engine needs travels in
/// this structure; the engine itself carries no year-specific numbers. The
/// allowance model is shared by the personal and the partner allowance:
///
/// ```text
/// allowance(base) = clamp(max - rate * max(0, base - threshold), 0, max)
/// ```
///
/// which reproduces the official living-minimum-derived tables (full allowance
/// below the threshold, linear phase-out above it, zero once the phase-out
/// crosses the axis).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,

    /// Full personal allowance (21.0 × living minimum for 2020).
    pub personal_allowance_max: Decimal,
    /// Income base up to which the full personal allowance applies
    /// (92.8 × living minimum).
    pub personal_allowance_threshold: Decimal,
    /// Linear phase-out slope shared by both allowances (statutory 1/4).
    pub allowance_phaseout_rate: Decimal,

    /// Full partner allowance (19.2 × living minimum).
    pub partner_allowance_max: Decimal,
    /// Taxpayer income base up to which the full partner allowance applies
    /// (176.8 × living minimum).
    pub partner_allowance_threshold: Decimal,
    /// Partner own income at or above which the partner allowance is zero.
    pub partner_income_threshold: Decimal,

    /// Taxable base breakpoint between the two tax rates
    /// (176.8 × living minimum).
    pub rate_threshold: Decimal,
    /// Rate applied up to `rate_threshold`.
    pub lower_rate: Decimal,
    /// Rate applied above `rate_threshold`.
    pub higher_rate: Decimal,

    /// Tax bonus per dependent child per month.
    pub child_bonus_monthly: Decimal,

    /// Annual ceiling on deductible supplementary pension contributions.
    pub pension_ceiling: Decimal,
    /// Per-person ceiling on deductible spa expenses.
    pub spa_ceiling_per_person: Decimal,
}

impl TaxYearConfig {
    /// The statutory constant set for tax year 2020 (living minimum 210.20).
    pub fn year_2020() -> Self {
        Self {
            tax_year: 2020,
            personal_allowance_max: Decimal::new(4_414_20, 2),
            personal_allowance_threshold: Decimal::new(19_506_56, 2),
            allowance_phaseout_rate: Decimal::new(25, 2),
            partner_allowance_max: Decimal::new(4_035_84, 2),
            partner_allowance_threshold: Decimal::new(37_163_36, 2),
            partner_income_threshold: Decimal::new(4_035_84, 2),
            rate_threshold: Decimal::new(37_163_36, 2),
            lower_rate: Decimal::new(19, 2),
            higher_rate: Decimal::new(25, 2),
            child_bonus_monthly: Decimal::new(22_72, 2),
            pension_ceiling: Decimal::new(180_00, 2),
            spa_ceiling_per_person: Decimal::new(50_00, 2),
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`TaxYearConfigError`] if any rate is outside [0, 1] or any
    /// amount field is negative.
    pub fn validate(&self) -> Result<(), TaxYearConfigError> {
        for (name, value) in [
            ("allowance_phaseout_rate", self.allowance_phaseout_rate),
            ("lower_rate", self.lower_rate),
            ("higher_rate", self.higher_rate),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(TaxYearConfigError::InvalidRate { name, value });
            }
        }
        for (name, value) in [
            ("personal_allowance_max", self.personal_allowance_max),
            (
                "personal_allowance_threshold",
                self.personal_allowance_threshold,
            ),
            ("partner_allowance_max", self.partner_allowance_max),
            (
                "partner_allowance_threshold",
                self.partner_allowance_threshold,
            ),
            ("partner_income_threshold", self.partner_income_threshold),
            ("rate_threshold", self.rate_threshold),
            ("child_bonus_monthly", self.child_bonus_monthly),
            ("pension_ceiling", self.pension_ceiling),
            ("spa_ceiling_per_person", self.spa_ceiling_per_person),
        ] {
            if value < Decimal::ZERO {
                return Err(TaxYearConfigError::NegativeAmount { name, value });
            }
        }
        Ok(())
    }
}
