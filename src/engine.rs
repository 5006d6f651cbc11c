//! Payroll computation engine.
//!
//! The `engine` module turns a [`PayrollInput`] into a
//! [`PayrollResult`] and back.  Gross-to-net composes the insurance
//! and tax modules in a fixed sequence; net-to-gross inverts it by
//! bisection because the clamped insurance base and the progressive
//! brackets make the mapping piecewise.  Whole payroll batches are
//! computed in parallel with [`rayon`].

use crate::error::CalcError;
use crate::insurance::{clamp_base, deduct};
use crate::models::{
    BatchLine, BatchResult, BatchTotals, EmployerCost, NetToGrossInput, PayrollBatch, PayrollInput,
    PayrollResult, WageRegion,
};
use crate::money::{ensure_amount, format_currency, MAX_AMOUNT};
use crate::statute::Statute;
use crate::tax::compute_tax;
use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

/// Minimum bisection steps once the target is bracketed.  Bisection
/// continues past this until the interval is at most one unit wide.
const SEARCH_STEPS: usize = 40;
/// Bisection never needs more: the widest interval is below `2^51`.
const MAX_SEARCH_STEPS: usize = 128;

/// Computes net pay, tax and insurance from a gross salary.
///
/// Amounts are validated first.  The regional minimum wage floors the
/// insurance base, so a very small gross salary can owe more insurance
/// than it earns; such inputs are rejected with
/// [`CalcError::ContributionsExceedGross`].
pub fn gross_to_net(input: &PayrollInput, statute: &Statute) -> Result<PayrollResult, CalcError> {
    ensure_amount("grossSalary", input.gross_salary)?;
    if let Some(base) = input.insurance_base {
        ensure_amount("insuranceBase", base)?;
    }
    let result = evaluate(
        input.gross_salary,
        input.dependent_count,
        input.region,
        input.insurance_base,
        statute,
    );
    let contributions = result.total_insurance();
    if contributions > result.gross {
        return Err(CalcError::ContributionsExceedGross { gross: result.gross, contributions });
    }
    debug!(
        regime = %statute.version,
        gross = %format_currency(result.gross),
        net = %format_currency(result.net),
        tax = %format_currency(result.tax),
        "gross to net"
    );
    Ok(result)
}

/// Finds the smallest whole gross salary whose net pay reaches
/// `input.target_net`.
///
/// The answer never exceeds [`MAX_AMOUNT`]; targets that would need a
/// larger gross are rejected with [`CalcError::OutOfRange`].
pub fn net_to_gross(input: &NetToGrossInput, statute: &Statute) -> Result<Decimal, CalcError> {
    let target = ensure_amount("targetNet", input.target_net)?;
    if let Some(base) = input.insurance_base {
        ensure_amount("insuranceBase", base)?;
    }
    if target.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let net_at = |gross: Decimal| {
        evaluate(gross, input.dependent_count, input.region, input.insurance_base, statute).net
    };

    // Net never exceeds gross, so the target itself is a lower bound.
    let mut low = target;
    let mut high = (target * dec!(2.2) + dec!(20000000)).min(MAX_AMOUNT);
    let mut expansions = 0;
    while net_at(high) < target {
        if high == MAX_AMOUNT {
            return Err(CalcError::OutOfRange { field: "targetNet", value: target });
        }
        low = high;
        high = (high * dec!(2)).min(MAX_AMOUNT);
        expansions += 1;
    }

    // Invariant: net_at(low) < target <= net_at(high).
    let mut steps = 0;
    while steps < SEARCH_STEPS || high - low > Decimal::ONE {
        if steps == MAX_SEARCH_STEPS {
            return Err(CalcError::SearchDiverged);
        }
        let mid = (low + high) / dec!(2);
        if net_at(mid) >= target {
            high = mid;
        } else {
            low = mid;
        }
        steps += 1;
    }
    // With `high - low <= 1` the first qualifying whole unit is either
    // the floor or the ceiling of `high`.
    let gross = if net_at(high.floor()) >= target { high.floor() } else { high.ceil() };
    debug!(
        regime = %statute.version,
        target = %format_currency(target),
        gross = %format_currency(gross),
        expansions,
        steps,
        "net to gross"
    );
    Ok(gross)
}

/// The unvalidated gross-to-net pipeline.  Total over non-negative
/// input; may produce a negative net when the insurance floor exceeds
/// the gross salary.
fn evaluate(
    gross: Decimal,
    dependent_count: u32,
    region: WageRegion,
    insurance_base: Option<Decimal>,
    statute: &Statute,
) -> PayrollResult {
    if gross.is_zero() && insurance_base.is_none() {
        return PayrollResult::default();
    }
    let base = clamp_base(insurance_base.unwrap_or(gross), region, statute);

    let employee = deduct(base, &statute.employee_rates);
    let dependent_deduction = statute.dependent_deduction * Decimal::from(dependent_count);
    let deductions = employee.total() + statute.personal_deduction + dependent_deduction;
    let taxable_income = (gross - deductions).max(Decimal::ZERO);
    let assessment = compute_tax(taxable_income, &statute.brackets);
    let net = gross - employee.total() - assessment.tax;

    let employer = deduct(base, &statute.employer_rates);
    PayrollResult {
        gross,
        insurance_base_used: base,
        social_insurance: employee.social,
        health_insurance: employee.health,
        unemployment_insurance: employee.unemployment,
        personal_deduction: statute.personal_deduction,
        dependent_deduction,
        taxable_income,
        tax: assessment.tax,
        tax_bracket: assessment.bracket_index,
        net,
        employer: EmployerCost {
            social_insurance: employer.social,
            health_insurance: employer.health,
            unemployment_insurance: employer.unemployment,
            total_cost: gross + employer.total(),
        },
    }
}

/// Runs gross-to-net for every employee of `batch` in parallel.
///
/// A failing employee is reported on its own line and left out of the
/// totals; the rest of the batch is unaffected.  Lines keep the input
/// order.
pub fn run_batch(batch: PayrollBatch, statute: &Statute) -> BatchResult {
    let lines: Vec<BatchLine> = batch
        .employees
        .into_par_iter()
        .map(|employee| match gross_to_net(&employee.payroll, statute) {
            Ok(result) => BatchLine {
                id: employee.id,
                name: employee.name,
                result: Some(result),
                error: None,
            },
            Err(err) => BatchLine {
                id: employee.id,
                name: employee.name,
                result: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    let mut totals = BatchTotals::default();
    for result in lines.iter().filter_map(|line| line.result.as_ref()) {
        totals.gross += result.gross;
        totals.employee_insurance += result.total_insurance();
        totals.tax += result.tax;
        totals.net += result.net;
        totals.employer_cost += result.employer.total_cost;
    }
    let failed = lines.iter().filter(|line| line.error.is_some()).count();
    info!(
        regime = %statute.version,
        employees = lines.len(),
        failed,
        net = %format_currency(totals.net),
        "payroll batch computed"
    );
    BatchResult {
        period: batch.period,
        regime: statute.version.clone(),
        lines,
        totals,
    }
}
