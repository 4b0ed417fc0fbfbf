use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Final settlement of one declaration.
///
/// A negative net liability is never reported as a negative amount due; it
/// becomes a refund with its own non-negative amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    /// Tax still owed (non-negative).
    Due(Decimal),
    /// Overpayment owed back to the taxpayer (positive).
    Refund(Decimal),
}

impl Settlement {
    /// Amount payable by the taxpayer, zero when a refund is due.
    pub fn amount_due(&self) -> Decimal {
        match self {
            Self::Due(amount) => *amount,
            Self::Refund(_) => Decimal::ZERO,
        }
    }

    /// Amount owed back to the taxpayer, zero when tax is due.
    pub fn refund(&self) -> Decimal {
        match self {
            Self::Due(_) => Decimal::ZERO,
            Self::Refund(amount) => *amount,
        }
    }
}

/// Partner allowance lines of the declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerLine {
    pub full_name: String,
    pub national_id: String,
    pub months: u8,
    pub own_income: Decimal,
}

/// One dependent child line of the declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildLine {
    pub full_name: String,
    pub national_id: String,
    /// Claimed range within the tax year; a full-year child is `1..=12`.
    pub month_from: u8,
    pub month_to: u8,
}

/// The complete computed declaration: every output line of the form, already
/// rounded to cents where monetary.
///
/// Produced once per [`TaxFormInput`](crate::TaxFormInput), immutable, and
/// consumed by the document serializer. Identity fields stay optional here;
/// the serializer decides which of them the schema mandates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub tax_year: i32,

    // Identity
    pub tax_id: Option<String>,
    pub nace_code: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub municipality: Option<String>,
    pub country: Option<String>,
    pub filing_date: Option<NaiveDate>,

    // Conditional sections
    pub partner: Option<PartnerLine>,
    pub children: Vec<ChildLine>,

    // Income
    pub se_income: Decimal,
    pub se_social_insurance: Decimal,
    pub se_health_insurance: Decimal,
    pub employment_income: Decimal,
    pub employment_contributions: Decimal,
    pub gross_income_total: Decimal,
    /// Gross income minus all mandatory contributions, floored at zero.
    pub income_base: Decimal,

    // Allowances and deductions
    pub personal_allowance: Decimal,
    pub partner_allowance: Decimal,
    pub pension_deduction: Decimal,
    pub mortgage_interest_deduction: Decimal,
    /// Months the mortgage-interest claim covers, 0 when not claimed.
    pub mortgage_months: u8,
    pub spa_deduction_taxpayer: Decimal,
    pub spa_deduction_partner: Decimal,
    pub spa_deduction_children: Decimal,

    // Tax
    pub taxable_base: Decimal,
    pub tax: Decimal,
    pub child_bonus_total: Decimal,
    pub partner_bonus_from_employer: Decimal,
    pub employment_advance_tax: Decimal,
    pub tax_prepayments: Decimal,
    pub settlement: Settlement,

    /// Account for paying out a bonus or overpayment, normalized IBAN.
    pub refund_iban: Option<String>,
}
