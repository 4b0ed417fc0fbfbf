//! The declaration computation engine.
//!
//! Combines the validated, prorated fact set into the full statutory
//! declaration, line by line:
//!
//! 1. Aggregate gross income (self-employment + employment).
//! 2. Subtract mandatory insurance contributions, floor at zero.
//! 3. Subtract the personal allowance (two-tier phase-out).
//! 4. Subtract the partner allowance (phase-out, minus the partner's own
//!    income, prorated by months).
//! 5. Subtract pension, mortgage-interest and spa deductions (already
//!    capped/prorated upstream).
//! 6. Apply the two-tier tax rate, floor at zero.
//! 7. Sum the per-child tax bonus (monthly rate × resolved months).
//! 8. Settle against the bonus, employer-applied partner bonus, employment
//!    advance tax and prepayments; a negative result becomes a refund.
//!
//! Intermediate values keep exact precision; rounding (half-up to cents)
//! happens once per output field.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::allowances::{partner_allowance, personal_allowance};
use crate::calculations::common::{floor_zero, round_half_up};
use crate::eligibility::{EligibilityFacts, resolve_facts};
use crate::error::TaxFormError;
use crate::models::{ChildLine, Declaration, PartnerLine, Settlement, TaxFormInput, TaxYearConfig};

/// Runs the whole pipeline: validation, fact resolution, computation.
///
/// This is the core's main entry point. It is pure and call-local; concurrent
/// invocations need no coordination.
///
/// # Errors
///
/// Any validator or resolver failure aborts the computation with that
/// specific [`TaxFormError`]; no partial declaration is ever returned.
pub fn compute_declaration(
    input: &TaxFormInput,
    config: &TaxYearConfig,
) -> Result<Declaration, TaxFormError> {
    config.validate()?;
    let facts = resolve_facts(input, config)?;
    Ok(DeclarationEngine::new(config).calculate(input, &facts))
}

/// Calculator producing a [`Declaration`] from resolved facts.
///
/// Infallible by construction: every statutory clamp, floor and cap is a
/// total function, and all inputs were validated upstream.
#[derive(Debug, Clone)]
pub struct DeclarationEngine<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> DeclarationEngine<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, input: &TaxFormInput, facts: &EligibilityFacts) -> Declaration {
        let config = self.config;

        let (employment_income, employment_contributions, advance_tax, employer_partner_bonus) =
            match &facts.employment {
                Some(e) => (
                    e.income,
                    e.withheld_contributions,
                    e.advance_tax,
                    e.partner_bonus_from_employer,
                ),
                None => (
                    Decimal::ZERO,
                    Decimal::ZERO,
                    Decimal::ZERO,
                    Decimal::ZERO,
                ),
            };

        // Step 1: gross income across both income kinds.
        let gross_income_total = facts.se_income + employment_income;

        // Step 2: net income base after mandatory contributions.
        let contributions =
            facts.se_social_insurance + facts.se_health_insurance + employment_contributions;
        let income_base = floor_zero(gross_income_total - contributions);

        // Steps 3-4: allowances, each rounded at its own output line.
        let personal = round_half_up(personal_allowance(income_base, config));
        let partner = match &facts.partner {
            Some(p) => round_half_up(partner_allowance(
                income_base,
                p.own_income,
                p.status.months(),
                config,
            )),
            None => Decimal::ZERO,
        };

        // Step 5: remaining deductible items, already capped upstream.
        let mortgage = facts
            .mortgage
            .as_ref()
            .map(|m| m.interest_paid)
            .unwrap_or(Decimal::ZERO);
        let mortgage_months = facts
            .mortgage
            .as_ref()
            .map(|m| m.status.months())
            .unwrap_or(0);
        let spa_total = facts.spa.taxpayer + facts.spa.partner + facts.spa.children;

        let mut taxable_base = floor_zero(income_base - personal);
        taxable_base = floor_zero(taxable_base - partner);
        taxable_base =
            floor_zero(taxable_base - facts.pension_contributions - mortgage - spa_total);

        // Step 6: two-tier rate.
        let tax = round_half_up(self.tiered_tax(taxable_base));

        // Step 7: dependent tax bonus, each child independent.
        let bonus_months: u32 = facts
            .children
            .iter()
            .map(|c| u32::from(c.status.months()))
            .sum();
        let child_bonus_total = config.child_bonus_monthly * Decimal::from(bonus_months);

        // Step 8: settlement. Negative net liability is a refund, never a
        // negative amount due.
        let net = tax - child_bonus_total - employer_partner_bonus - advance_tax
            - facts.tax_prepayments;
        let settlement = if net < Decimal::ZERO {
            Settlement::Refund(round_half_up(-net))
        } else {
            Settlement::Due(round_half_up(net))
        };
        debug!(%tax, %child_bonus_total, ?settlement, "declaration settled");

        Declaration {
            tax_year: config.tax_year,

            tax_id: input.tax_id.clone(),
            nace_code: input.nace_code.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            title: input.title.clone(),
            street: input.street.clone(),
            house_number: input.house_number.clone(),
            postal_code: input.postal_code.clone(),
            municipality: input.municipality.clone(),
            country: input.country.clone(),
            filing_date: parse_filing_date(input.filing_date.as_deref()),

            partner: facts.partner.as_ref().map(|p| PartnerLine {
                full_name: p.full_name.clone(),
                national_id: p.rodne_cislo.as_digits().to_string(),
                months: p.status.months(),
                own_income: p.own_income,
            }),
            children: facts
                .children
                .iter()
                .map(|c| ChildLine {
                    full_name: c.full_name.clone(),
                    national_id: c.rodne_cislo.as_digits().to_string(),
                    month_from: c.month_from,
                    month_to: c.month_to,
                })
                .collect(),

            se_income: facts.se_income,
            se_social_insurance: facts.se_social_insurance,
            se_health_insurance: facts.se_health_insurance,
            employment_income,
            employment_contributions,
            gross_income_total,
            income_base,

            personal_allowance: personal,
            partner_allowance: partner,
            pension_deduction: facts.pension_contributions,
            mortgage_interest_deduction: mortgage,
            mortgage_months,
            spa_deduction_taxpayer: facts.spa.taxpayer,
            spa_deduction_partner: facts.spa.partner,
            spa_deduction_children: facts.spa.children,

            taxable_base,
            tax,
            child_bonus_total,
            partner_bonus_from_employer: employer_partner_bonus,
            employment_advance_tax: advance_tax,
            tax_prepayments: facts.tax_prepayments,
            settlement,

            refund_iban: facts.refund_iban.clone(),
        }
    }

    /// Lower rate up to the breakpoint, higher rate above it.
    fn tiered_tax(&self, base: Decimal) -> Decimal {
        let config = self.config;
        if base <= config.rate_threshold {
            base * config.lower_rate
        } else {
            config.rate_threshold * config.lower_rate
                + (base - config.rate_threshold) * config.higher_rate
        }
    }
}

/// Filing date is presentational; an unparseable value is dropped rather than
/// failing the computation.
fn parse_filing_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    match NaiveDate::parse_from_str(raw, "%d.%m.%Y") {
        Ok(date) => Some(date),
        Err(_) => {
            debug!(raw, "ignoring unparseable filing date");
            None
        }
    }
}
