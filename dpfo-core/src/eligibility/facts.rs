use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validators::RodneCislo;

/// Resolved applicability of one conditional declaration section.
///
/// Computed once by the eligibility resolver and treated as immutable input
/// by the computation engine; no section's flags are re-examined downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionStatus {
    NotApplicable,
    FullYear,
    /// Applicable for part of the year, in whole months (1-12).
    Months(u8),
}

impl SectionStatus {
    /// Number of months the section applies for, 0 when not applicable.
    pub fn months(&self) -> u8 {
        match self {
            Self::NotApplicable => 0,
            Self::FullYear => 12,
            Self::Months(months) => *months,
        }
    }
}

/// Validated employment-section amounts. All default to zero when the
/// corresponding field was left blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentFacts {
    pub income: Decimal,
    pub withheld_contributions: Decimal,
    pub advance_tax: Decimal,
    pub partner_bonus_from_employer: Decimal,
}

/// Validated partner-allowance facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerFacts {
    pub full_name: String,
    pub rodne_cislo: RodneCislo,
    pub status: SectionStatus,
    /// Partner's own income over the claimed period, as supplied.
    pub own_income: Decimal,
}

/// Validated facts for one dependent child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildFacts {
    pub full_name: String,
    pub rodne_cislo: RodneCislo,
    pub status: SectionStatus,
    pub month_from: u8,
    pub month_to: u8,
    pub spa_care: bool,
}

/// Validated mortgage-interest facts. The interest amount is the
/// already-prorated figure the caller supplied; only the month count is
/// checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageFacts {
    pub interest_paid: Decimal,
    pub status: SectionStatus,
}

/// Spa expenses already truncated to the per-person ceilings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaFacts {
    pub taxpayer: Decimal,
    pub partner: Decimal,
    pub children: Decimal,
}

/// The fully resolved, validated and prorated fact set for one computation.
///
/// Owned exclusively by the computation engine during its run; derived once
/// and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityFacts {
    pub se_income: Decimal,
    pub se_social_insurance: Decimal,
    pub se_health_insurance: Decimal,
    pub tax_prepayments: Decimal,

    pub employment: Option<EmploymentFacts>,
    pub partner: Option<PartnerFacts>,
    pub children: Vec<ChildFacts>,
    pub mortgage: Option<MortgageFacts>,
    /// Deductible pension contributions, already capped at the ceiling.
    pub pension_contributions: Decimal,
    pub spa: SpaFacts,

    /// Normalized payout account, present only when a payout was requested.
    pub refund_iban: Option<String>,
}
