//! Unemployment insurance benefit.

use crate::error::CalcError;
use crate::models::{SalarySchedule, UnemploymentInput, UnemploymentResult};
use crate::money::ensure_amount;
use crate::statute::Statute;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

/// Contribution months required before any benefit is paid.
const QUALIFYING_MONTHS: u32 = 12;
/// Benefit months earned by the first qualifying year.
const BASE_BENEFIT_MONTHS: u32 = 3;
const MAX_BENEFIT_MONTHS: u32 = 12;

/// Number of months of allowance earned by `contribution_months`.
pub fn benefit_months(contribution_months: u32) -> u32 {
    if contribution_months < QUALIFYING_MONTHS {
        return 0;
    }
    let extra_years = (contribution_months - QUALIFYING_MONTHS) / 12;
    BASE_BENEFIT_MONTHS.saturating_add(extra_years).min(MAX_BENEFIT_MONTHS)
}

/// Monthly allowance (60% of the capped average salary, itself capped
/// at five base salaries) and the number of months it is paid.
pub fn compute_benefit(
    input: &UnemploymentInput,
    statute: &Statute,
) -> Result<UnemploymentResult, CalcError> {
    ensure_amount("sixMonthAverageSalary", input.six_month_average_salary)?;

    let reference = match input.salary_schedule {
        SalarySchedule::StateBased => statute.base_salary,
        SalarySchedule::RegionBased => statute.minimum_wage(input.region),
    };
    let max_insurable_salary = reference * statute.insurance_cap_multiplier;
    let applied_salary = input.six_month_average_salary.min(max_insurable_salary);
    let monthly_allowance = (applied_salary * dec!(0.6)).min(statute.base_salary * dec!(5));
    let months = benefit_months(input.contribution_months);

    debug!(
        regime = %statute.version,
        %monthly_allowance,
        months,
        "unemployment benefit"
    );
    Ok(UnemploymentResult {
        monthly_allowance,
        benefit_months: months,
        applied_salary,
        max_insurable_salary,
        total_allowance: monthly_allowance * Decimal::from(months),
    })
}
