//! Personal and partner allowance phase-out curves.
//!
//! Both allowances share one model: a full amount below an income threshold,
//! a linear phase-out above it, and zero once the phase-out line crosses the
//! axis. The partner allowance is additionally reduced by the partner's own
//! income and prorated by the months the household condition held.

use rust_decimal::Decimal;

use crate::calculations::common::floor_zero;
use crate::models::TaxYearConfig;

/// The shared phase-out curve: `clamp(max - rate * (base - threshold), 0, max)`.
fn phased_allowance(base: Decimal, max: Decimal, threshold: Decimal, rate: Decimal) -> Decimal {
    if base <= threshold {
        return max;
    }
    floor_zero(max - rate * (base - threshold))
}

/// Personal deductible allowance as a function of the net income base.
///
/// Exact, unrounded; the engine rounds at the output-field boundary.
pub fn personal_allowance(base: Decimal, config: &TaxYearConfig) -> Decimal {
    phased_allowance(
        base,
        config.personal_allowance_max,
        config.personal_allowance_threshold,
        config.allowance_phaseout_rate,
    )
}

/// Partner allowance for a partner with `own_income` over `months` claimed
/// months, given the taxpayer's income base.
///
/// The phase-out runs on the taxpayer's base; the partner's own income then
/// reduces the result (clamped at zero, so income at or above the full-period
/// threshold yields no allowance), and the remainder is prorated by
/// `months / 12`. Exact, unrounded.
pub fn partner_allowance(
    base: Decimal,
    own_income: Decimal,
    months: u8,
    config: &TaxYearConfig,
) -> Decimal {
    let full_period = phased_allowance(
        base,
        config.partner_allowance_max,
        config.partner_allowance_threshold,
        config.allowance_phaseout_rate,
    );
    let after_income = floor_zero(full_period - own_income);
    after_income * Decimal::from(months) / Decimal::from(12u8)
}
