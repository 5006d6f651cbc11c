//! Progressive personal income tax.
//!
//! The `tax` module resolves which bracket a monthly taxable income
//! falls into and computes the tax with the quick-deduction method.
//! Bracket tables are data (see [`crate::statute`]); the functions
//! here only interpret them.

use crate::error::CalcError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One slice of a progressive schedule.
///
/// `base_tax` is the published cumulative tax owed on all income below
/// `lower_bound`.  The quick deduction is derived from it so that a
/// single multiplication gives the same result as summing every lower
/// slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    /// `None` for the open-ended top bracket.
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub base_tax: Decimal,
}

impl TaxBracket {
    pub fn quick_deduction(&self) -> Decimal {
        self.rate * self.lower_bound - self.base_tax
    }

    fn covers(&self, income: Decimal) -> bool {
        self.upper_bound.is_none_or(|upper| income <= upper)
    }
}

/// Tax owed on a taxable income and the bracket that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxAssessment {
    pub tax: Decimal,
    pub bracket_index: Option<usize>,
}

/// The part of an income taxed at one bracket's rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketSlice {
    pub bracket_index: usize,
    pub rate: Decimal,
    pub taxed_amount: Decimal,
    pub tax: Decimal,
}

/// The seven-bracket monthly schedule (5% to 35%, boundaries at
/// 5/10/18/32/52/80 million).
pub fn standard_brackets() -> Vec<TaxBracket> {
    let rows = [
        (dec!(0), Some(dec!(5000000)), dec!(0.05), dec!(0)),
        (dec!(5000000), Some(dec!(10000000)), dec!(0.10), dec!(250000)),
        (dec!(10000000), Some(dec!(18000000)), dec!(0.15), dec!(750000)),
        (dec!(18000000), Some(dec!(32000000)), dec!(0.20), dec!(1950000)),
        (dec!(32000000), Some(dec!(52000000)), dec!(0.25), dec!(4750000)),
        (dec!(52000000), Some(dec!(80000000)), dec!(0.30), dec!(9750000)),
        (dec!(80000000), None, dec!(0.35), dec!(18150000)),
    ];
    rows.into_iter()
        .map(|(lower_bound, upper_bound, rate, base_tax)| TaxBracket {
            lower_bound,
            upper_bound,
            rate,
            base_tax,
        })
        .collect()
}

/// Computes the tax on `taxable_income` under `brackets`.
///
/// The first bracket is closed at zero; every other bracket is
/// `lower < income <= upper`.  A non-positive income owes nothing and
/// resolves no bracket.
pub fn compute_tax(taxable_income: Decimal, brackets: &[TaxBracket]) -> TaxAssessment {
    if taxable_income <= Decimal::ZERO || brackets.is_empty() {
        return TaxAssessment { tax: Decimal::ZERO, bracket_index: None };
    }
    let index = brackets
        .iter()
        .position(|bracket| bracket.covers(taxable_income))
        .unwrap_or(brackets.len() - 1);
    let bracket = &brackets[index];
    let tax = (bracket.rate * taxable_income - bracket.quick_deduction()).max(Decimal::ZERO);
    TaxAssessment { tax, bracket_index: Some(index) }
}

/// Splits `taxable_income` into the slices taxed at each rate.  The
/// slice taxes sum to [`compute_tax`]'s result.
pub fn tax_breakdown(taxable_income: Decimal, brackets: &[TaxBracket]) -> Vec<BracketSlice> {
    let mut slices = Vec::new();
    for (bracket_index, bracket) in brackets.iter().enumerate() {
        if taxable_income <= bracket.lower_bound {
            break;
        }
        let top = match bracket.upper_bound {
            Some(upper) => taxable_income.min(upper),
            None => taxable_income,
        };
        let taxed_amount = top - bracket.lower_bound;
        slices.push(BracketSlice {
            bracket_index,
            rate: bracket.rate,
            taxed_amount,
            tax: taxed_amount * bracket.rate,
        });
    }
    slices
}

/// Checks that a bracket table is usable: starts at zero, ascending,
/// contiguous, open-ended only at the top, with rates in `[0, 1]` and a
/// cumulative `base_tax` column consistent with the rates.
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), CalcError> {
    let first = brackets
        .first()
        .ok_or_else(|| CalcError::InvalidStatute("bracket table is empty".into()))?;
    if !first.lower_bound.is_zero() || !first.base_tax.is_zero() {
        return Err(CalcError::InvalidStatute("first bracket must start at zero".into()));
    }
    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            let message = format!("bracket {index} has rate {}", bracket.rate);
            return Err(CalcError::InvalidStatute(message));
        }
        let is_last = index + 1 == brackets.len();
        match (bracket.upper_bound, is_last) {
            (None, true) => {}
            (None, false) => {
                let message = format!("bracket {index} is unbounded but not last");
                return Err(CalcError::InvalidStatute(message));
            }
            (Some(_), true) => {
                return Err(CalcError::InvalidStatute("last bracket must be unbounded".into()));
            }
            (Some(upper), false) => {
                let next = &brackets[index + 1];
                if upper <= bracket.lower_bound || next.lower_bound != upper {
                    return Err(CalcError::InvalidStatute(format!(
                        "bracket {index} is not contiguous with bracket {}",
                        index + 1
                    )));
                }
                let expected = bracket.base_tax + (upper - bracket.lower_bound) * bracket.rate;
                if next.base_tax != expected {
                    return Err(CalcError::InvalidStatute(format!(
                        "bracket {} base tax {} should be {expected}",
                        index + 1,
                        next.base_tax
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_valid() {
        let brackets = standard_brackets();
        assert_eq!(brackets.len(), 7);
        assert!(validate_brackets(&brackets).is_ok());
        let quick: Vec<Decimal> = brackets.iter().map(TaxBracket::quick_deduction).collect();
        assert_eq!(
            quick,
            vec![
                dec!(0),
                dec!(250000),
                dec!(750000),
                dec!(1650000),
                dec!(3250000),
                dec!(5850000),
                dec!(9850000)
            ]
        );
    }

    #[test]
    fn test_second_bracket_scenario() {
        let assessment = compute_tax(dec!(6900000), &standard_brackets());
        assert_eq!(assessment.bracket_index, Some(1));
        assert_eq!(assessment.tax, dec!(440000));
    }

    #[test]
    fn test_non_positive_income_owes_nothing() {
        let brackets = standard_brackets();
        assert_eq!(
            compute_tax(Decimal::ZERO, &brackets),
            TaxAssessment { tax: Decimal::ZERO, bracket_index: None }
        );
        assert_eq!(compute_tax(dec!(-5), &brackets).tax, Decimal::ZERO);
    }

    #[test]
    fn test_boundaries_belong_to_lower_bracket() {
        let brackets = standard_brackets();
        assert_eq!(compute_tax(dec!(5000000), &brackets).bracket_index, Some(0));
        assert_eq!(compute_tax(dec!(5000000), &brackets).tax, dec!(250000));
        assert_eq!(compute_tax(dec!(5000001), &brackets).bracket_index, Some(1));
        assert_eq!(compute_tax(dec!(80000000), &brackets).tax, dec!(18150000));
        assert_eq!(compute_tax(dec!(100000000), &brackets).bracket_index, Some(6));
        assert_eq!(compute_tax(dec!(100000000), &brackets).tax, dec!(25150000));
    }

    #[test]
    fn test_breakdown_sums_to_quick_method() {
        let brackets = standard_brackets();
        for income in [dec!(1), dec!(4999999), dec!(18000000), dec!(41234567), dec!(250000000)] {
            let slices = tax_breakdown(income, &brackets);
            let sum: Decimal = slices.iter().map(|s| s.tax).sum();
            let taxed: Decimal = slices.iter().map(|s| s.taxed_amount).sum();
            assert_eq!(sum, compute_tax(income, &brackets).tax, "income {income}");
            assert_eq!(taxed, income);
        }
        assert!(tax_breakdown(Decimal::ZERO, &brackets).is_empty());
    }

    #[test]
    fn test_rejects_broken_tables() {
        let mut gap = standard_brackets();
        gap[2].lower_bound = dec!(11000000);
        assert!(validate_brackets(&gap).is_err());

        let mut capped = standard_brackets();
        capped[6].upper_bound = Some(dec!(900000000));
        assert!(validate_brackets(&capped).is_err());

        let mut wrong_base = standard_brackets();
        wrong_base[3].base_tax = dec!(1650000);
        assert!(validate_brackets(&wrong_base).is_err());

        assert!(validate_brackets(&[]).is_err());
    }
}
