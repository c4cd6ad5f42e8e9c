//! Feeding calculation module
//!
//! Normalizes manufacturer feeding charts and interpolates daily amounts.

pub mod age;
pub mod error;
pub mod interpolator;
pub mod normalizer;
pub mod portions;
pub mod units;

pub use age::{age_in_days_today, diff_in_days, parse_birth_date};
pub use error::{Axis, AxisProblem, Diagnosis, FeedError, FeedErrorKind, FeedResult};
pub use interpolator::{compute, Query};
pub use normalizer::{normalize, DEFAULT_FEED_NAME};
pub use portions::{portions_per_day, round_to_step, DEFAULT_ROUNDING_STEP};
pub use units::{AgeUnit, ValueUnit, WeightUnit};
