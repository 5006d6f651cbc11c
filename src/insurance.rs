//! Mandatory insurance contributions.

use crate::models::{Contributions, WageRegion};
use crate::statute::{ContributionRates, Statute};
use rust_decimal::Decimal;

/// Clamps `base` into the insurable range for `region`: no lower than
/// the regional minimum wage and no higher than the statutory multiple
/// of it.
pub fn clamp_base(base: Decimal, region: WageRegion, statute: &Statute) -> Decimal {
    let floor = statute.minimum_wage(region);
    let ceiling = floor * statute.insurance_cap_multiplier;
    base.max(floor).min(ceiling)
}

/// Applies `rates` to an already clamped base.
pub fn deduct(clamped_base: Decimal, rates: &ContributionRates) -> Contributions {
    Contributions {
        social: clamped_base * rates.social,
        health: clamped_base * rates.health,
        unemployment: clamped_base * rates.unemployment,
    }
}
