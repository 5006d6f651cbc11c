//! Shared helpers for currency amounts: validation, rounding and
//! display formatting.

use crate::error::CalcError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Largest amount any calculator accepts (one quadrillion units).
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000_000);

/// Checks that `value` is a usable currency amount.
pub fn ensure_amount(field: &'static str, value: Decimal) -> Result<Decimal, CalcError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CalcError::NegativeAmount { field, value });
    }
    if value > MAX_AMOUNT {
        return Err(CalcError::OutOfRange { field, value });
    }
    Ok(value)
}

/// Checks that an annual percentage rate lies in `[0, 100]`.
pub fn ensure_rate_percent(field: &'static str, value: Decimal) -> Result<Decimal, CalcError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CalcError::NegativeAmount { field, value });
    }
    if value > dec!(100) {
        return Err(CalcError::OutOfRange { field, value });
    }
    Ok(value)
}

/// Rounds to two decimal places, half away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount in whole units with `.` as the thousands
/// separator, e.g. `17.460.000`.
pub fn format_currency(value: Decimal) -> String {
    let whole = value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .abs()
        .trunc()
        .to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if value.round_dp(0).is_sign_negative() && !value.round_dp(0).is_zero() {
        grouped.insert(0, '-');
    }
    grouped
}

pub(crate) fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
    a.checked_mul(b).ok_or(CalcError::Overflow)
}

pub(crate) fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
    a.checked_add(b).ok_or(CalcError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_thousands_separator() {
        assert_eq!(format_currency(dec!(17460000)), "17.460.000");
        assert_eq!(format_currency(dec!(999)), "999");
        assert_eq!(format_currency(dec!(1000)), "1.000");
        assert_eq!(format_currency(dec!(0)), "0");
        assert_eq!(format_currency(dec!(12682503.49)), "12.682.503");
        assert_eq!(format_currency(dec!(-2500000)), "-2.500.000");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_currency(dec!(1.005)), dec!(1.01));
        assert_eq!(round_currency(dec!(12682503.0133)), dec!(12682503.01));
    }

    #[test]
    fn rejects_negative_and_huge_amounts() {
        assert!(ensure_amount("gross", dec!(0)).is_ok());
        assert_eq!(
            ensure_amount("gross", dec!(-1)),
            Err(CalcError::NegativeAmount { field: "gross", value: dec!(-1) })
        );
        assert!(matches!(
            ensure_amount("gross", MAX_AMOUNT + dec!(1)),
            Err(CalcError::OutOfRange { .. })
        ));
        assert!(ensure_rate_percent("rate", dec!(100)).is_ok());
        assert!(ensure_rate_percent("rate", dec!(100.5)).is_err());
    }
}
