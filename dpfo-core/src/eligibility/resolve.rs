use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::TaxFormError;
use crate::models::{ChildInput, TaxFormInput, TaxYearConfig};
use crate::validators::{
    ALLOWED_COUNTRY, RodneCislo, parse_amount, parse_amount_or_zero, validate_iban,
};

use super::facts::{
    ChildFacts, EligibilityFacts, EmploymentFacts, MortgageFacts, PartnerFacts, SectionStatus,
    SpaFacts,
};

/// Resolves the raw form record into the validated, prorated fact set.
///
/// Fails fast on the first malformed identifier, amount or month range; a
/// section whose flag is unset resolves to not-applicable without looking at
/// its sub-fields. Statutory ceilings truncate, they never reject.
pub fn resolve_facts(
    input: &TaxFormInput,
    config: &TaxYearConfig,
) -> Result<EligibilityFacts, TaxFormError> {
    let se_income = required_amount("se_income", input.se_income.as_deref())?;
    let se_social_insurance =
        optional_amount("se_social_insurance", input.se_social_insurance.as_deref())?;
    let se_health_insurance =
        optional_amount("se_health_insurance", input.se_health_insurance.as_deref())?;
    let tax_prepayments = optional_amount(
        "tax_prepayments_paid",
        input.tax_prepayments_paid.as_deref(),
    )?;

    Ok(EligibilityFacts {
        se_income,
        se_social_insurance,
        se_health_insurance,
        tax_prepayments,
        employment: resolve_employment(input)?,
        partner: resolve_partner(input)?,
        children: resolve_children(input)?,
        mortgage: resolve_mortgage(input)?,
        pension_contributions: resolve_pension(input, config)?,
        spa: resolve_spa(input, config)?,
        refund_iban: resolve_refund_account(input)?,
    })
}

fn resolve_employment(input: &TaxFormInput) -> Result<Option<EmploymentFacts>, TaxFormError> {
    if !input.employed {
        return Ok(None);
    }
    Ok(Some(EmploymentFacts {
        income: optional_amount("employment_income", input.employment_income.as_deref())?,
        withheld_contributions: optional_amount(
            "employment_contributions",
            input.employment_contributions.as_deref(),
        )?,
        advance_tax: optional_amount(
            "employment_advance_tax",
            input.employment_advance_tax.as_deref(),
        )?,
        partner_bonus_from_employer: optional_amount(
            "partner_bonus_from_employer",
            input.partner_bonus_from_employer.as_deref(),
        )?,
    }))
}

fn resolve_partner(input: &TaxFormInput) -> Result<Option<PartnerFacts>, TaxFormError> {
    if !input.claims_partner_allowance {
        return Ok(None);
    }
    let full_name = required_text("partner_full_name", input.partner_full_name.as_deref())?;
    let national_id = required_text("partner_national_id", input.partner_national_id.as_deref())?;
    let rodne_cislo = RodneCislo::parse(&national_id)
        .map_err(|e| TaxFormError::invalid_national_id("partner_national_id", e))?;
    let months = parse_month("partner_months", input.partner_months.as_deref())?;
    let own_income = required_amount("partner_own_income", input.partner_own_income.as_deref())?;

    let status = if months == 12 {
        SectionStatus::FullYear
    } else {
        SectionStatus::Months(months)
    };
    Ok(Some(PartnerFacts {
        full_name,
        rodne_cislo,
        status,
        own_income,
    }))
}

fn resolve_children(input: &TaxFormInput) -> Result<Vec<ChildFacts>, TaxFormError> {
    if !input.has_children {
        return Ok(Vec::new());
    }
    if input.children.is_empty() {
        return Err(TaxFormError::missing("children"));
    }
    input
        .children
        .iter()
        .enumerate()
        .map(|(index, child)| resolve_child(index, child))
        .collect()
}

fn resolve_child(index: usize, child: &ChildInput) -> Result<ChildFacts, TaxFormError> {
    let name_field = format!("children[{index}].full_name");
    if child.full_name.trim().is_empty() {
        return Err(TaxFormError::missing(&name_field));
    }
    let id_field = format!("children[{index}].national_id");
    let rodne_cislo = RodneCislo::parse(&child.national_id)
        .map_err(|e| TaxFormError::invalid_national_id(&id_field, e))?;

    let (status, month_from, month_to) = if child.whole_year {
        (SectionStatus::FullYear, 1, 12)
    } else {
        let from = parse_month(
            &format!("children[{index}].month_from"),
            child.month_from.as_deref(),
        )?;
        let to = parse_month(
            &format!("children[{index}].month_to"),
            child.month_to.as_deref(),
        )?;
        if from > to {
            return Err(TaxFormError::invalid_month_range(
                &format!("children[{index}]"),
                format!("{from}..={to}"),
            ));
        }
        (SectionStatus::Months(to - from + 1), from, to)
    };

    Ok(ChildFacts {
        full_name: child.full_name.trim().to_string(),
        rodne_cislo,
        status,
        month_from,
        month_to,
        spa_care: child.spa_care,
    })
}

fn resolve_mortgage(input: &TaxFormInput) -> Result<Option<MortgageFacts>, TaxFormError> {
    if !input.claims_mortgage_interest {
        return Ok(None);
    }
    // The interest figure is already the elapsed-month total; it is taken as
    // supplied and only the month count is bounds-checked.
    let interest_paid = required_amount(
        "mortgage_interest_paid",
        input.mortgage_interest_paid.as_deref(),
    )?;
    let months = parse_month("mortgage_months", input.mortgage_months.as_deref())?;
    let status = if months == 12 {
        SectionStatus::FullYear
    } else {
        SectionStatus::Months(months)
    };
    Ok(Some(MortgageFacts {
        interest_paid,
        status,
    }))
}

fn resolve_pension(input: &TaxFormInput, config: &TaxYearConfig) -> Result<Decimal, TaxFormError> {
    if !input.paid_pension_contributions {
        return Ok(Decimal::ZERO);
    }
    let paid = required_amount(
        "pension_contributions_paid",
        input.pension_contributions_paid.as_deref(),
    )?;
    Ok(cap_amount("pension_contributions_paid", paid, config.pension_ceiling))
}

fn resolve_spa(input: &TaxFormInput, config: &TaxYearConfig) -> Result<SpaFacts, TaxFormError> {
    if !input.visited_spa {
        return Ok(SpaFacts::default());
    }
    let ceiling = config.spa_ceiling_per_person;

    let taxpayer = if input.taxpayer_in_spa {
        let paid = required_amount(
            "taxpayer_spa_expenses",
            input.taxpayer_spa_expenses.as_deref(),
        )?;
        cap_amount("taxpayer_spa_expenses", paid, ceiling)
    } else {
        Decimal::ZERO
    };

    let partner = if input.partner_in_spa {
        let paid = required_amount("partner_spa_expenses", input.partner_spa_expenses.as_deref())?;
        cap_amount("partner_spa_expenses", paid, ceiling)
    } else {
        Decimal::ZERO
    };

    let children = if input.children_in_spa {
        let paid = required_amount(
            "children_spa_expenses",
            input.children_spa_expenses.as_deref(),
        )?;
        // The form carries one aggregate figure for all children, so the
        // per-person ceiling degenerates to ceiling × spa-flagged children.
        let flagged = input.children.iter().filter(|c| c.spa_care).count();
        let aggregate_ceiling = ceiling * Decimal::from(flagged as u64);
        cap_amount("children_spa_expenses", paid, aggregate_ceiling)
    } else {
        Decimal::ZERO
    };

    Ok(SpaFacts {
        taxpayer,
        partner,
        children,
    })
}

fn resolve_refund_account(input: &TaxFormInput) -> Result<Option<String>, TaxFormError> {
    if !input.requests_refund_payout {
        return Ok(None);
    }
    let raw = required_text("iban", input.iban.as_deref())?;
    let normalized =
        validate_iban(&raw, ALLOWED_COUNTRY).map_err(|e| TaxFormError::InvalidBankAccount {
            field: "iban".to_string(),
            source: e,
        })?;
    Ok(Some(normalized))
}

fn required_text(field: &str, value: Option<&str>) -> Result<String, TaxFormError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TaxFormError::missing(field))
}

fn required_amount(field: &str, value: Option<&str>) -> Result<Decimal, TaxFormError> {
    let raw = required_text(field, value)?;
    parse_amount(&raw).map_err(|e| TaxFormError::malformed_amount(field, e))
}

fn optional_amount(field: &str, value: Option<&str>) -> Result<Decimal, TaxFormError> {
    parse_amount_or_zero(value).map_err(|e| TaxFormError::malformed_amount(field, e))
}

fn parse_month(field: &str, value: Option<&str>) -> Result<u8, TaxFormError> {
    let raw = required_text(field, value)?;
    let month: u8 = raw
        .parse()
        .map_err(|_| TaxFormError::invalid_month_range(field, raw.clone()))?;
    if !(1..=12).contains(&month) {
        return Err(TaxFormError::invalid_month_range(field, raw));
    }
    Ok(month)
}

/// Statutory ceiling: truncates, never rejects.
fn cap_amount(field: &str, amount: Decimal, ceiling: Decimal) -> Decimal {
    if amount > ceiling {
        warn!(field, %amount, %ceiling, "amount exceeds statutory ceiling, truncating");
        ceiling
    } else {
        debug!(field, %amount, "amount within statutory ceiling");
        amount
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::ChildInput;
    use crate::validators::{AmountError, RodneCisloError};

    use super::*;

    fn base_input() -> TaxFormInput {
        TaxFormInput {
            se_income: Some("25000".to_string()),
            se_social_insurance: Some("1000".to_string()),
            se_health_insurance: Some("1000".to_string()),
            ..TaxFormInput::default()
        }
    }

    fn child(whole_year: bool, from: &str, to: &str) -> ChildInput {
        ChildInput {
            id: 1,
            full_name: "Morty Smith".to_string(),
            national_id: "1607201167".to_string(),
            spa_care: false,
            whole_year,
            month_from: Some(from.to_string()),
            month_to: Some(to.to_string()),
        }
    }

    #[test]
    fn minimal_input_resolves_all_sections_not_applicable() {
        let facts = resolve_facts(&base_input(), &TaxYearConfig::year_2020()).unwrap();

        assert_eq!(facts.se_income, dec!(25000));
        assert_eq!(facts.employment, None);
        assert_eq!(facts.partner, None);
        assert_eq!(facts.children, Vec::new());
        assert_eq!(facts.mortgage, None);
        assert_eq!(facts.pension_contributions, Decimal::ZERO);
        assert_eq!(facts.spa, SpaFacts::default());
        assert_eq!(facts.refund_iban, None);
    }

    #[test]
    fn missing_se_income_is_an_error() {
        let input = TaxFormInput::default();

        assert_eq!(
            resolve_facts(&input, &TaxYearConfig::year_2020()),
            Err(TaxFormError::missing("se_income"))
        );
    }

    #[test]
    fn malformed_amount_names_the_field() {
        let input = TaxFormInput {
            se_social_insurance: Some("1,2oo".to_string()),
            ..base_input()
        };

        assert_eq!(
            resolve_facts(&input, &TaxYearConfig::year_2020()),
            Err(TaxFormError::MalformedAmount {
                field: "se_social_insurance".to_string(),
                source: AmountError::NotANumber("1,2oo".to_string()),
            })
        );
    }

    #[test]
    fn employment_amounts_default_to_zero() {
        let input = TaxFormInput {
            employed: true,
            employment_income: Some("4000".to_string()),
            ..base_input()
        };

        let facts = resolve_facts(&input, &TaxYearConfig::year_2020()).unwrap();

        assert_eq!(
            facts.employment,
            Some(EmploymentFacts {
                income: dec!(4000),
                withheld_contributions: Decimal::ZERO,
                advance_tax: Decimal::ZERO,
                partner_bonus_from_employer: Decimal::ZERO,
            })
        );
    }

    #[test]
    fn partner_requires_national_id() {
        let input = TaxFormInput {
            claims_partner_allowance: true,
            partner_full_name: Some("Fake Fake".to_string()),
            partner_months: Some("12".to_string()),
            partner_own_income: Some("3000".to_string()),
            ..base_input()
        };

        assert_eq!(
            resolve_facts(&input, &TaxYearConfig::year_2020()),
            Err(TaxFormError::missing("partner_national_id"))
        );
    }

    #[test]
    fn partner_national_id_is_checksum_validated() {
        let input = TaxFormInput {
            claims_partner_allowance: true,
            partner_full_name: Some("Fake Fake".to_string()),
            partner_national_id: Some("9609226285".to_string()),
            partner_months: Some("12".to_string()),
            partner_own_income: Some("3000".to_string()),
            ..base_input()
        };

        assert_eq!(
            resolve_facts(&input, &TaxYearConfig::year_2020()),
            Err(TaxFormError::InvalidNationalId {
                field: "partner_national_id".to_string(),
                source: RodneCisloError::ChecksumMismatch,
            })
        );
    }

    #[test]
    fn partner_full_twelve_months_resolves_full_year() {
        let input = TaxFormInput {
            claims_partner_allowance: true,
            partner_full_name: Some("Fake Fake".to_string()),
            partner_national_id: Some("9609226286".to_string()),
            partner_months: Some("12".to_string()),
            partner_own_income: Some("3000".to_string()),
            ..base_input()
        };

        let facts = resolve_facts(&input, &TaxYearConfig::year_2020()).unwrap();
        let partner = facts.partner.unwrap();

        assert_eq!(partner.status, SectionStatus::FullYear);
        assert_eq!(partner.status.months(), 12);
        assert_eq!(partner.own_income, dec!(3000));
    }

    #[test]
    fn partner_months_out_of_bounds_fail() {
        let input = TaxFormInput {
            claims_partner_allowance: true,
            partner_full_name: Some("Fake Fake".to_string()),
            partner_national_id: Some("9609226286".to_string()),
            partner_months: Some("13".to_string()),
            partner_own_income: Some("0".to_string()),
            ..base_input()
        };

        assert_eq!(
            resolve_facts(&input, &TaxYearConfig::year_2020()),
            Err(TaxFormError::invalid_month_range("partner_months", "13"))
        );
    }

    #[test]
    fn whole_year_child_resolves_months_one_to_twelve() {
        let input = TaxFormInput {
            has_children: true,
            children: vec![child(true, "6", "11")],
            ..base_input()
        };

        let facts = resolve_facts(&input, &TaxYearConfig::year_2020()).unwrap();

        assert_eq!(facts.children[0].status, SectionStatus::FullYear);
        assert_eq!(facts.children[0].month_from, 1);
        assert_eq!(facts.children[0].month_to, 12);
    }

    #[test]
    fn partial_year_child_counts_inclusive_months() {
        let input = TaxFormInput {
            has_children: true,
            children: vec![child(false, "6", "11")],
            ..base_input()
        };

        let facts = resolve_facts(&input, &TaxYearConfig::year_2020()).unwrap();

        assert_eq!(facts.children[0].status, SectionStatus::Months(6));
    }

    #[test]
    fn backwards_child_range_fails() {
        let input = TaxFormInput {
            has_children: true,
            children: vec![child(false, "8", "5")],
            ..base_input()
        };

        assert_eq!(
            resolve_facts(&input, &TaxYearConfig::year_2020()),
            Err(TaxFormError::invalid_month_range("children[0]", "8..=5"))
        );
    }

    #[test]
    fn children_flag_without_entries_fails() {
        let input = TaxFormInput {
            has_children: true,
            ..base_input()
        };

        assert_eq!(
            resolve_facts(&input, &TaxYearConfig::year_2020()),
            Err(TaxFormError::missing("children"))
        );
    }

    #[test]
    fn pension_contributions_truncate_at_the_ceiling() {
        let input = TaxFormInput {
            paid_pension_contributions: true,
            pension_contributions_paid: Some("250".to_string()),
            ..base_input()
        };

        let facts = resolve_facts(&input, &TaxYearConfig::year_2020()).unwrap();

        assert_eq!(facts.pension_contributions, dec!(180.00));
    }

    #[test]
    fn spa_expenses_cap_per_person() {
        let input = TaxFormInput {
            visited_spa: true,
            taxpayer_in_spa: true,
            taxpayer_spa_expenses: Some("75".to_string()),
            partner_in_spa: true,
            partner_spa_expenses: Some("20".to_string()),
            children_in_spa: true,
            children_spa_expenses: Some("120".to_string()),
            has_children: true,
            children: vec![
                ChildInput {
                    spa_care: true,
                    ..child(true, "1", "12")
                },
                ChildInput {
                    spa_care: true,
                    ..child(true, "1", "12")
                },
            ],
            ..base_input()
        };

        let facts = resolve_facts(&input, &TaxYearConfig::year_2020()).unwrap();

        assert_eq!(facts.spa.taxpayer, dec!(50.00));
        assert_eq!(facts.spa.partner, dec!(20));
        // Two spa-flagged children: aggregate ceiling 100.
        assert_eq!(facts.spa.children, dec!(100.00));
    }

    #[test]
    fn spa_sub_sections_are_independent() {
        let input = TaxFormInput {
            visited_spa: true,
            partner_in_spa: true,
            partner_spa_expenses: Some("20".to_string()),
            ..base_input()
        };

        let facts = resolve_facts(&input, &TaxYearConfig::year_2020()).unwrap();

        assert_eq!(facts.spa.taxpayer, Decimal::ZERO);
        assert_eq!(facts.spa.partner, dec!(20));
        assert_eq!(facts.spa.children, Decimal::ZERO);
    }

    #[test]
    fn refund_payout_requires_a_valid_slovak_iban() {
        let missing = TaxFormInput {
            requests_refund_payout: true,
            ..base_input()
        };
        assert_eq!(
            resolve_facts(&missing, &TaxYearConfig::year_2020()),
            Err(TaxFormError::missing("iban"))
        );

        let valid = TaxFormInput {
            requests_refund_payout: true,
            iban: Some("sk31 1200 0000 1987 4263 7541".to_string()),
            ..base_input()
        };
        let facts = resolve_facts(&valid, &TaxYearConfig::year_2020()).unwrap();
        assert_eq!(
            facts.refund_iban,
            Some("SK3112000000198742637541".to_string())
        );
    }
}
