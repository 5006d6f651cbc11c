//! Calculation errors.
//!
//! Every public calculator validates its input before doing any
//! arithmetic and reports problems through [`CalcError`].  Once the
//! input is accepted the calculation itself cannot fail, apart from
//! decimal overflow on extreme compounding horizons.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// A currency amount was below zero.
    #[error("{field} cannot be negative: {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// A value was outside the range the calculators accept.
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: Decimal },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The statutory insurance floor pushed employee contributions
    /// above the gross salary.
    #[error("insurance contributions {contributions} exceed gross salary {gross}")]
    ContributionsExceedGross { gross: Decimal, contributions: Decimal },

    #[error("unknown tax regime: {0}")]
    UnknownRegime(String),

    #[error("invalid statute: {0}")]
    InvalidStatute(String),

    #[error("decimal overflow")]
    Overflow,

    /// Net-to-gross could not find an upper bound for the target.
    #[error("net-to-gross search did not converge")]
    SearchDiverged,
}
