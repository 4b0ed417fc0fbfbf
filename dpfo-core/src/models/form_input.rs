use serde::{Deserialize, Serialize};

/// The raw record handed over by the form wizard.
///
/// Nothing here is trusted: amounts and months arrive as locale-formatted
/// strings, identifiers are unchecked, and absent optional fields mean "this
/// section does not apply" unless the section's own flag says otherwise. The
/// eligibility resolver turns this into validated, typed facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxFormInput {
    // Taxpayer identity
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
    /// Filing date as entered, `DD.MM.YYYY`.
    pub filing_date: Option<String>,

    // Self-employment income and insurance
    pub se_income: Option<String>,
    pub se_social_insurance: Option<String>,
    pub se_health_insurance: Option<String>,
    /// Income-tax prepayments already paid during the year.
    pub tax_prepayments_paid: Option<String>,

    // Employment
    pub employed: bool,
    pub employment_income: Option<String>,
    pub employment_contributions: Option<String>,
    pub employment_advance_tax: Option<String>,
    /// Partner bonus already applied by the employer during the year.
    pub partner_bonus_from_employer: Option<String>,

    // Partner allowance
    pub claims_partner_allowance: bool,
    pub partner_full_name: Option<String>,
    pub partner_national_id: Option<String>,
    /// Months of shared household within the tax year, 1-12.
    pub partner_months: Option<String>,
    pub partner_own_income: Option<String>,

    // Dependent children
    pub has_children: bool,
    pub children: Vec<ChildInput>,

    // Mortgage interest
    pub claims_mortgage_interest: bool,
    pub mortgage_interest_paid: Option<String>,
    pub mortgage_months: Option<String>,

    // Supplementary pension (third pillar)
    pub paid_pension_contributions: bool,
    pub pension_contributions_paid: Option<String>,

    // Spa expenses
    pub visited_spa: bool,
    pub taxpayer_in_spa: bool,
    pub taxpayer_spa_expenses: Option<String>,
    pub partner_in_spa: bool,
    pub partner_spa_expenses: Option<String>,
    pub children_in_spa: bool,
    /// Aggregate spa expenses across all spa-flagged children.
    pub children_spa_expenses: Option<String>,

    // Payout of a tax bonus or overpayment
    pub requests_refund_payout: bool,
    pub iban: Option<String>,
}

/// One dependent child or student entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildInput {
    pub id: u32,
    pub full_name: String,
    pub national_id: String,
    /// The child received spa care during the year.
    pub spa_care: bool,
    /// Lived in the household the whole calendar year.
    pub whole_year: bool,
    /// First month of the claimed range, 1-12. Ignored when `whole_year`.
    pub month_from: Option<String>,
    /// Last month of the claimed range, 1-12. Ignored when `whole_year`.
    pub month_to: Option<String>,
}
