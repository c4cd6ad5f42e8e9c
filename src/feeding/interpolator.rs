//! Feeding interpolation
//!
//! Bilinear interpolation over a canonical feed. When the query sits on a grid
//! line the same formula degenerates to a 1D interpolation or a single cell,
//! and only the cells that actually carry weight are consulted.

use std::num::NonZeroU32;

use crate::models::{CanonicalFeed, CellRef, CornerTrace, FeedingResult};

use super::error::{FeedError, FeedResult};
use super::portions::{portions_per_day, round_to_step, DEFAULT_ROUNDING_STEP};

/// A single feeding question
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub weight_kg: f64,
    pub age_days: f64,
    pub rounding_step: NonZeroU32,
}

impl Query {
    pub fn new(weight_kg: f64, age_days: f64) -> Self {
        Self {
            weight_kg,
            age_days,
            rounding_step: DEFAULT_ROUNDING_STEP,
        }
    }

    pub fn with_rounding_step(mut self, step: NonZeroU32) -> Self {
        self.rounding_step = step;
        self
    }
}

/// Adjacent breakpoints enclosing a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bracket {
    lo: usize,
    hi: usize,
}

/// Locate the bracket for an in-range value
///
/// An interior breakpoint closes the interval to its left, the axis maximum
/// closes the last interval, and a single-point axis brackets to itself.
fn bracket(axis: &[f64], value: f64) -> Bracket {
    if axis.len() < 2 {
        return Bracket { lo: 0, hi: 0 };
    }
    let last_pair = axis.len() - 2;
    let lo = axis
        .windows(2)
        .position(|pair| value >= pair[0] && value <= pair[1])
        .unwrap_or(last_pair);
    Bracket { lo, hi: lo + 1 }
}

/// Fraction of the way from the low to the high breakpoint
fn fraction(axis: &[f64], b: Bracket, value: f64) -> f64 {
    let (lo, hi) = (axis[b.lo], axis[b.hi]);
    if hi == lo {
        0.0
    } else {
        (value - lo) / (hi - lo)
    }
}

fn is_exact(fraction: f64) -> bool {
    fraction == 0.0 || fraction == 1.0
}

/// Cells whose bilinear weight is non-zero, in row-major order
fn select_cells(x: Bracket, y: Bracket, t: f64, u: f64) -> Vec<CellRef> {
    let fixed = |b: Bracket, f: f64| if f == 0.0 { b.lo } else { b.hi };
    match (is_exact(t), is_exact(u)) {
        (true, true) => vec![CellRef::new(fixed(y, u), fixed(x, t))],
        (false, true) => {
            let row = fixed(y, u);
            vec![CellRef::new(row, x.lo), CellRef::new(row, x.hi)]
        }
        (true, false) => {
            let col = fixed(x, t);
            vec![CellRef::new(y.lo, col), CellRef::new(y.hi, col)]
        }
        (false, false) => vec![
            CellRef::new(y.lo, x.lo),
            CellRef::new(y.lo, x.hi),
            CellRef::new(y.hi, x.lo),
            CellRef::new(y.hi, x.hi),
        ],
    }
}

/// Compute the recommended feeding for a query
pub fn compute(feed: &CanonicalFeed, query: &Query) -> FeedResult<FeedingResult> {
    let bounds = feed.bounds();
    if !bounds.contains(query.weight_kg, query.age_days) {
        return Err(FeedError::OutOfRange { bounds });
    }

    let weights = feed.weight_axis();
    let ages = feed.age_axis();

    let x = bracket(weights, query.weight_kg);
    let y = bracket(ages, query.age_days);
    let t = fraction(weights, x, query.weight_kg);
    let u = fraction(ages, y, query.age_days);

    let used_cells = select_cells(x, y, t, u);
    let missing: Vec<CellRef> = used_cells
        .iter()
        .copied()
        .filter(|c| feed.cell(c.age_index, c.weight_index).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(FeedError::MissingData { cells: missing });
    }

    let q11 = feed.cell(y.lo, x.lo);
    let q21 = feed.cell(y.lo, x.hi);
    let q12 = feed.cell(y.hi, x.lo);
    let q22 = feed.cell(y.hi, x.hi);

    // Corners outside the selected cells have a zero coefficient
    let raw_grams_per_day = q11.unwrap_or(0.0) * (1.0 - t) * (1.0 - u)
        + q21.unwrap_or(0.0) * t * (1.0 - u)
        + q12.unwrap_or(0.0) * (1.0 - t) * u
        + q22.unwrap_or(0.0) * t * u;

    let grams_per_day = round_to_step(raw_grams_per_day, query.rounding_step);
    let portions = portions_per_day(query.age_days);
    let grams_per_portion =
        round_to_step(grams_per_day / f64::from(portions), query.rounding_step);

    tracing::debug!(
        "Computed {} g/day ({} x {} g) for {} kg at {} days using {} cell(s)",
        grams_per_day,
        portions,
        grams_per_portion,
        query.weight_kg,
        query.age_days,
        used_cells.len()
    );

    Ok(FeedingResult {
        grams_per_day,
        portions_per_day: portions,
        grams_per_portion,
        corner_trace: CornerTrace {
            x0: weights[x.lo],
            x1: weights[x.hi],
            y0: ages[y.lo],
            y1: ages[y.hi],
            x0_index: x.lo,
            x1_index: x.hi,
            y0_index: y.lo,
            y1_index: y.hi,
            q11,
            q21,
            q12,
            q22,
            t,
            u,
            raw_grams_per_day,
        },
        used_cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeding::error::FeedErrorKind;
    use crate::feeding::normalizer::normalize;
    use crate::models::{RangeBounds, RawFeed};
    use serde_json::{json, Value};

    fn feed(weights: Value, ages: Value, values: Value) -> CanonicalFeed {
        let raw = RawFeed::from_json(json!({
            "axes": {
                "weight": { "unit": "kg", "values": weights },
                "age": { "unit": "days", "values": ages }
            },
            "grid": { "unit": "g/day", "values": values }
        }))
        .unwrap();
        normalize(&raw).unwrap()
    }

    fn square(values: Value) -> CanonicalFeed {
        feed(json!([5, 10]), json!([60, 120]), values)
    }

    fn step(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_center_interpolation() {
        let feed = square(json!([[200, 300], [200, 300]]));
        let result = compute(&feed, &Query::new(7.5, 90.0)).unwrap();
        assert_eq!(result.grams_per_day, 250.0);
        assert_eq!(result.portions_per_day, 4);
        assert_eq!(result.grams_per_portion, 65.0);
        assert_eq!(result.used_cells.len(), 4);
        assert_eq!(result.corner_trace.t, 0.5);
        assert_eq!(result.corner_trace.u, 0.5);
    }

    #[test]
    fn test_rounding_steps() {
        let feed = square(json!([[203, 307], [203, 307]]));
        let at = |n| {
            let query = Query::new(7.5, 90.0).with_rounding_step(step(n));
            compute(&feed, &query).unwrap()
        };
        assert_eq!(at(5).grams_per_day, 255.0);
        assert_eq!(at(10).grams_per_day, 260.0);
        assert_eq!(at(1).grams_per_day, 255.0);
        assert_eq!(at(1).corner_trace.raw_grams_per_day, 255.0);
    }

    #[test]
    fn test_per_portion_is_rounded_again() {
        let feed = square(json!([[203, 307], [203, 307]]));
        let query = Query::new(7.5, 90.0).with_rounding_step(step(10));
        let result = compute(&feed, &query).unwrap();
        // 260 / 4 = 65, rounded to the 10 g step
        assert_eq!(result.grams_per_portion, 70.0);
    }

    #[test]
    fn test_out_of_range_carries_bounds() {
        let feed = square(json!([[200, 300], [200, 300]]));
        let err = compute(&feed, &Query::new(15.0, 90.0)).unwrap_err();
        assert_eq!(
            err,
            FeedError::OutOfRange {
                bounds: RangeBounds {
                    age_min: 60.0,
                    age_max: 120.0,
                    w_min: 5.0,
                    w_max: 10.0,
                },
            }
        );
        for (weight, age) in [(7.5, 150.0), (4.99, 90.0), (7.5, f64::NAN)] {
            let err = compute(&feed, &Query::new(weight, age)).unwrap_err();
            assert_eq!(err.kind(), FeedErrorKind::OutOfRange);
        }
    }

    #[test]
    fn test_grid_point_returns_stored_value() {
        let feed = feed(
            json!([2, 4, 8]),
            json!([30, 60, 90]),
            json!([[101, 133, 167], [149, 181, 223], [199, 241, 293]]),
        );
        for (age_index, age) in [30.0, 60.0, 90.0].into_iter().enumerate() {
            for (weight_index, weight) in [2.0, 4.0, 8.0].into_iter().enumerate() {
                let query = Query::new(weight, age).with_rounding_step(step(1));
                let result = compute(&feed, &query).unwrap();
                let stored = feed.cell(age_index, weight_index).unwrap();
                assert_eq!(result.corner_trace.raw_grams_per_day, stored);
                assert_eq!(
                    result.used_cells,
                    vec![CellRef::new(age_index, weight_index)]
                );
            }
        }
    }

    #[test]
    fn test_interior_breakpoint_uses_left_bracket() {
        let feed = feed(
            json!([2, 4, 8]),
            json!([30, 60]),
            json!([[100, 150, 200], [120, 170, 220]]),
        );
        let result = compute(&feed, &Query::new(4.0, 30.0)).unwrap();
        assert_eq!((result.corner_trace.x0_index, result.corner_trace.x1_index), (0, 1));
        assert_eq!(result.corner_trace.t, 1.0);
        assert_eq!(result.used_cells, vec![CellRef::new(0, 1)]);
    }

    #[test]
    fn test_axis_maximum_brackets_last_pair() {
        let feed = square(json!([[200, 300], [220, 330]]));
        let result = compute(&feed, &Query::new(10.0, 120.0)).unwrap();
        assert_eq!((result.corner_trace.x0_index, result.corner_trace.x1_index), (0, 1));
        assert_eq!((result.corner_trace.y0_index, result.corner_trace.y1_index), (0, 1));
        assert_eq!(result.used_cells, vec![CellRef::new(1, 1)]);
        assert_eq!(result.grams_per_day, 330.0);
    }

    #[test]
    fn test_exact_age_interpolates_weight_only() {
        let feed = square(json!([[200, 300], [null, null]]));
        let result = compute(&feed, &Query::new(7.5, 60.0)).unwrap();
        assert_eq!(
            result.used_cells,
            vec![CellRef::new(0, 0), CellRef::new(0, 1)]
        );
        assert_eq!(result.grams_per_day, 250.0);
    }

    #[test]
    fn test_exact_weight_interpolates_age_only() {
        let feed = square(json!([[200, null], [260, null]]));
        let result = compute(&feed, &Query::new(5.0, 90.0)).unwrap();
        assert_eq!(
            result.used_cells,
            vec![CellRef::new(0, 0), CellRef::new(1, 0)]
        );
        assert_eq!(result.grams_per_day, 230.0);
    }

    #[test]
    fn test_missing_data_lists_every_missing_corner() {
        let feed = square(json!([[200, null], [null, 300]]));
        let err = compute(&feed, &Query::new(7.5, 90.0)).unwrap_err();
        assert_eq!(
            err,
            FeedError::MissingData {
                cells: vec![CellRef::new(0, 1), CellRef::new(1, 0)],
            }
        );
    }

    #[test]
    fn test_missing_single_cell() {
        let feed = square(json!([[200, 300], [null, 300]]));
        let err = compute(&feed, &Query::new(5.0, 120.0)).unwrap_err();
        assert_eq!(
            err,
            FeedError::MissingData {
                cells: vec![CellRef::new(1, 0)],
            }
        );
    }

    #[test]
    fn test_single_point_axes() {
        let point = feed(json!([5]), json!([60]), json!([[180]]));
        let result = compute(&point, &Query::new(5.0, 60.0)).unwrap();
        assert_eq!(result.grams_per_day, 180.0);
        assert_eq!(result.used_cells, vec![CellRef::new(0, 0)]);
        let err = compute(&point, &Query::new(5.1, 60.0)).unwrap_err();
        assert_eq!(err.kind(), FeedErrorKind::OutOfRange);

        let one_weight = feed(json!([5]), json!([60, 120]), json!([[180], [240]]));
        let result = compute(&one_weight, &Query::new(5.0, 90.0)).unwrap();
        assert_eq!(result.corner_trace.t, 0.0);
        assert_eq!(result.grams_per_day, 210.0);
        assert_eq!(
            result.used_cells,
            vec![CellRef::new(0, 0), CellRef::new(1, 0)]
        );
    }

    #[test]
    fn test_portions_follow_age() {
        let feed = feed(
            json!([5, 10]),
            json!([60, 240]),
            json!([[200, 300], [200, 300]]),
        );
        for (age, portions) in [(121.75, 4), (122.0, 3), (183.0, 2)] {
            let result = compute(&feed, &Query::new(7.5, age)).unwrap();
            assert_eq!(result.portions_per_day, portions);
        }
    }

    #[test]
    fn test_corner_trace_values() {
        let feed = square(json!([[200, 300], [240, 360]]));
        let result = compute(&feed, &Query::new(6.0, 75.0)).unwrap();
        let trace = &result.corner_trace;
        assert_eq!(
            (trace.x0, trace.x1, trace.y0, trace.y1),
            (5.0, 10.0, 60.0, 120.0)
        );
        assert_eq!(
            (trace.q11, trace.q21, trace.q12, trace.q22),
            (Some(200.0), Some(300.0), Some(240.0), Some(360.0))
        );
        // 200*.8*.75 + 300*.2*.75 + 240*.8*.25 + 360*.2*.25 = 231
        assert!((trace.raw_grams_per_day - 231.0).abs() < 1e-9);
        assert_eq!(result.grams_per_day, 230.0);
    }
}
