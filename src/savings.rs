//! Compound growth projections and savings plans.
//!
//! Both calculations use the ordinary annuity model: interest
//! compounds once per contribution period and each contribution is
//! made at the end of its period.

use crate::error::CalcError;
use crate::models::{
    ContributionFrequency, FutureValueInput, FutureValueResult, SavingsGoalInput, SavingsPlanResult,
    YearBalance,
};
use crate::money::{checked_add, checked_mul, ensure_amount, ensure_rate_percent, round_currency};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use tracing::debug;

const MAX_YEARS: u32 = 100;

/// Projects `principal` plus periodic contributions forward.
///
/// A zero-year horizon projects nothing and returns zeros.  A zero
/// rate degenerates to plain summation.
pub fn future_value(input: &FutureValueInput) -> Result<FutureValueResult, CalcError> {
    ensure_amount("principal", input.principal)?;
    ensure_amount("contribution", input.contribution)?;
    ensure_rate_percent("annualRatePercent", input.annual_rate_percent)?;
    ensure_years(input.years, 0)?;
    if input.years == 0 {
        return Ok(FutureValueResult::default());
    }

    let periods = total_periods(input.frequency, input.years);
    let rate = period_rate(input.annual_rate_percent, input.frequency);
    let future_value = balance_after(input.principal, input.contribution, rate, periods)?;
    let total_contributed = checked_add(
        input.principal,
        checked_mul(input.contribution, Decimal::from(periods))?,
    )?;
    debug!(periods, %rate, %future_value, "future value");
    Ok(FutureValueResult {
        future_value: round_currency(future_value),
        total_contributed: round_currency(total_contributed),
        interest_earned: round_currency(future_value - total_contributed),
    })
}

/// Solves for the periodic payment that grows `initial_amount` into
/// `target_amount` within the horizon, and lists the balance at the end
/// of every year.
pub fn required_contribution(input: &SavingsGoalInput) -> Result<SavingsPlanResult, CalcError> {
    ensure_amount("targetAmount", input.target_amount)?;
    ensure_amount("initialAmount", input.initial_amount)?;
    ensure_rate_percent("annualRatePercent", input.annual_rate_percent)?;
    ensure_years(input.years, 1)?;

    let frequency = input.contribution_frequency;
    let periods = total_periods(frequency, input.years);
    let rate = period_rate(input.annual_rate_percent, frequency);

    // The annuity formula is linear in the payment:
    // goal = initial * g + payment * (g - 1) / r
    let grown_initial = balance_after(input.initial_amount, Decimal::ZERO, rate, periods)?;
    let shortfall = input.target_amount - grown_initial;
    let payment = if shortfall <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        let one_unit_annuity = balance_after(Decimal::ZERO, Decimal::ONE, rate, periods)?;
        shortfall / one_unit_annuity
    };

    let per_year = frequency.periods_per_year();
    let mut breakdown = Vec::with_capacity(input.years as usize);
    for year in 1..=input.years {
        let elapsed = per_year * year;
        let balance = balance_after(input.initial_amount, payment, rate, elapsed)?;
        let contributed = input.initial_amount + payment * Decimal::from(elapsed);
        breakdown.push(YearBalance {
            year,
            balance: round_currency(balance),
            cumulative_contribution: round_currency(contributed),
        });
    }
    debug!(periods, %rate, %payment, "savings plan");
    Ok(SavingsPlanResult {
        required_periodic_payment: round_currency(payment),
        year_by_year_breakdown: breakdown,
    })
}

fn ensure_years(years: u32, min: u32) -> Result<(), CalcError> {
    if years < min || years > MAX_YEARS {
        return Err(CalcError::InvalidInput(format!(
            "years must be between {min} and {MAX_YEARS}, got {years}"
        )));
    }
    Ok(())
}

fn total_periods(frequency: ContributionFrequency, years: u32) -> u32 {
    frequency.periods_per_year() * years
}

fn period_rate(annual_rate_percent: Decimal, frequency: ContributionFrequency) -> Decimal {
    annual_rate_percent / dec!(100) / Decimal::from(frequency.periods_per_year())
}

/// Balance after `periods` periods of compounding at `rate`, with
/// `contribution` added at the end of each period.
fn balance_after(
    principal: Decimal,
    contribution: Decimal,
    rate: Decimal,
    periods: u32,
) -> Result<Decimal, CalcError> {
    if rate.is_zero() {
        return checked_add(principal, checked_mul(contribution, Decimal::from(periods))?);
    }
    let growth = (Decimal::ONE + rate)
        .checked_powi(i64::from(periods))
        .ok_or(CalcError::Overflow)?;
    let annuity = checked_mul(contribution, growth - Decimal::ONE)? / rate;
    checked_add(checked_mul(principal, growth)?, annuity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(
        principal: Decimal,
        contribution: Decimal,
        rate: Decimal,
        years: u32,
    ) -> FutureValueInput {
        FutureValueInput {
            principal,
            contribution,
            annual_rate_percent: rate,
            years,
            frequency: ContributionFrequency::Monthly,
        }
    }

    #[test]
    fn test_monthly_annuity_scenario() {
        let result = future_value(&monthly(Decimal::ZERO, dec!(1000000), dec!(12), 1)).unwrap();
        assert_eq!(result.future_value.round(), dec!(12682503));
        assert_eq!(result.total_contributed, dec!(12000000));
        assert_eq!(result.interest_earned, result.future_value - dec!(12000000));
    }

    #[test]
    fn test_principal_only_growth() {
        let input = FutureValueInput {
            principal: dec!(100000000),
            contribution: Decimal::ZERO,
            annual_rate_percent: dec!(10),
            years: 2,
            frequency: ContributionFrequency::Yearly,
        };
        let result = future_value(&input).unwrap();
        assert_eq!(result.future_value, dec!(121000000));
        assert_eq!(result.interest_earned, dec!(21000000));
    }

    #[test]
    fn test_zero_rate_is_simple_sum() {
        let input = monthly(dec!(5000000), dec!(1000000), Decimal::ZERO, 2);
        let result = future_value(&input).unwrap();
        assert_eq!(result.future_value, dec!(29000000));
        assert_eq!(result.interest_earned, Decimal::ZERO);
    }

    #[test]
    fn test_zero_years_is_zero() {
        let result = future_value(&monthly(dec!(5000000), dec!(1000000), dec!(6), 0)).unwrap();
        assert_eq!(result, FutureValueResult::default());
    }

    #[test]
    fn test_rejects_bad_rates_and_horizons() {
        assert!(future_value(&monthly(dec!(1), dec!(1), dec!(-1), 1)).is_err());
        assert!(future_value(&monthly(dec!(1), dec!(1), dec!(101), 1)).is_err());
        assert!(future_value(&monthly(dec!(1), dec!(1), dec!(5), 101)).is_err());
        assert!(future_value(&monthly(dec!(-1), dec!(1), dec!(5), 1)).is_err());
    }

    #[test]
    fn test_extreme_compounding_overflows_cleanly() {
        let input = monthly(dec!(1000000000000000), dec!(1000000000000000), dec!(100), 100);
        assert_eq!(future_value(&input), Err(CalcError::Overflow));
    }

    #[test]
    fn test_required_contribution_reaches_goal() {
        let plan = required_contribution(&SavingsGoalInput {
            target_amount: dec!(12682503.01),
            initial_amount: Decimal::ZERO,
            years: 1,
            annual_rate_percent: dec!(12),
            contribution_frequency: ContributionFrequency::Monthly,
        })
        .unwrap();
        assert_eq!(plan.required_periodic_payment, dec!(1000000));
        assert_eq!(plan.year_by_year_breakdown.len(), 1);
    }

    #[test]
    fn test_required_contribution_breakdown() {
        let plan = required_contribution(&SavingsGoalInput {
            target_amount: dec!(500000000),
            initial_amount: dec!(50000000),
            years: 5,
            annual_rate_percent: dec!(6),
            contribution_frequency: ContributionFrequency::Quarterly,
        })
        .unwrap();
        let years: Vec<u32> = plan.year_by_year_breakdown.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![1, 2, 3, 4, 5]);
        for pair in plan.year_by_year_breakdown.windows(2) {
            assert!(pair[1].balance > pair[0].balance);
            assert!(pair[1].cumulative_contribution > pair[0].cumulative_contribution);
        }
        let last = plan.year_by_year_breakdown.last().unwrap();
        assert!((last.balance - dec!(500000000)).abs() <= dec!(1));
    }

    #[test]
    fn test_goal_already_met_needs_no_payment() {
        let plan = required_contribution(&SavingsGoalInput {
            target_amount: dec!(100),
            initial_amount: dec!(1000),
            years: 3,
            annual_rate_percent: dec!(5),
            contribution_frequency: ContributionFrequency::Yearly,
        })
        .unwrap();
        assert_eq!(plan.required_periodic_payment, Decimal::ZERO);
        assert_eq!(plan.year_by_year_breakdown[0].balance, dec!(1050));
        assert_eq!(plan.year_by_year_breakdown[2].cumulative_contribution, dec!(1000));
    }

    #[test]
    fn test_plan_growth_beyond_decimal_range_overflows() {
        // 2^100 exceeds Decimal's range whatever the initial amount.
        let plan = required_contribution(&SavingsGoalInput {
            target_amount: dec!(1000000),
            initial_amount: Decimal::ZERO,
            years: 100,
            annual_rate_percent: dec!(100),
            contribution_frequency: ContributionFrequency::Yearly,
        });
        assert_eq!(plan, Err(CalcError::Overflow));
    }

    #[test]
    fn test_zero_rate_plan_divides_evenly() {
        let plan = required_contribution(&SavingsGoalInput {
            target_amount: dec!(1200),
            initial_amount: Decimal::ZERO,
            years: 1,
            annual_rate_percent: Decimal::ZERO,
            contribution_frequency: ContributionFrequency::Monthly,
        })
        .unwrap();
        assert_eq!(plan.required_periodic_payment, dec!(100));
        assert!(required_contribution(&SavingsGoalInput {
            target_amount: dec!(1200),
            initial_amount: Decimal::ZERO,
            years: 0,
            annual_rate_percent: Decimal::ZERO,
            contribution_frequency: ContributionFrequency::Monthly,
        })
        .is_err());
    }
}
