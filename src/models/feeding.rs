//! Feeding result model
//!
//! Output of a single query against a canonical feed.

use serde::Serialize;

/// A grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRef {
    pub age_index: usize,
    pub weight_index: usize,
}

impl CellRef {
    pub fn new(age_index: usize, weight_index: usize) -> Self {
        Self { age_index, weight_index }
    }
}

/// Axis extremes of a feed, attached to out-of-range diagnoses
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeBounds {
    pub age_min: f64,
    pub age_max: f64,
    pub w_min: f64,
    pub w_max: f64,
}

impl RangeBounds {
    /// Closed-interval containment on both axes; NaN is never contained
    pub fn contains(&self, weight_kg: f64, age_days: f64) -> bool {
        (self.w_min..=self.w_max).contains(&weight_kg)
            && (self.age_min..=self.age_max).contains(&age_days)
    }
}

/// How a value was derived, for explaining the result to the user
///
/// `q11` is the age-low/weight-low corner, `q21` age-low/weight-high,
/// `q12` age-high/weight-low, `q22` age-high/weight-high.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CornerTrace {
    /// Weight bracket in kg
    pub x0: f64,
    pub x1: f64,
    /// Age bracket in days
    pub y0: f64,
    pub y1: f64,
    pub x0_index: usize,
    pub x1_index: usize,
    pub y0_index: usize,
    pub y1_index: usize,
    pub q11: Option<f64>,
    pub q21: Option<f64>,
    pub q12: Option<f64>,
    pub q22: Option<f64>,
    /// Weight fraction
    pub t: f64,
    /// Age fraction
    pub u: f64,
    /// Unrounded interpolated grams per day
    pub raw_grams_per_day: f64,
}

/// Recommended feeding for one weight/age query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedingResult {
    pub grams_per_day: f64,
    pub portions_per_day: u32,
    pub grams_per_portion: f64,
    pub corner_trace: CornerTrace,
    pub used_cells: Vec<CellRef>,
}
