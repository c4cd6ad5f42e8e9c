//! Portion count and step rounding

use std::num::NonZeroU32;

use super::units::DAYS_PER_MONTH;

/// Rounding step used when the caller does not pick one
pub const DEFAULT_ROUNDING_STEP: NonZeroU32 = match NonZeroU32::new(5) {
    Some(step) => step,
    None => unreachable!(),
};

/// Number of meals per day for a puppy of the given age
///
/// Four meals below four months, three below six months, two afterwards.
/// Both thresholds are strict: exactly four months still gets four meals.
pub fn portions_per_day(age_days: f64) -> u32 {
    let age_months = age_days / DAYS_PER_MONTH;
    if age_months < 4.0 {
        4
    } else if age_months < 6.0 {
        3
    } else {
        2
    }
}

/// Round to the nearest multiple of `step`, halves away from zero
pub fn round_to_step(value: f64, step: NonZeroU32) -> f64 {
    let step = f64::from(step.get());
    (value / step).round() * step
}
