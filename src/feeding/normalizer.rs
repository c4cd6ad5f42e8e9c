//! Feed normalization
//!
//! Converts an imported chart into canonical units and validates its shape.
//! Checks run in a fixed order so the first applicable diagnosis is the one
//! reported: structure, weight axis, age axis, value unit, dimensions,
//! positivity.

use crate::models::{
    CanonicalFeed, FeedIdentity, PresentedAxis, Presentation, RawAxis, RawFeed, RawGrid,
};

use super::error::{Axis, AxisProblem, FeedError, FeedResult};
use super::units::{AgeUnit, ValueUnit, WeightUnit};

/// Name given to charts imported without one
pub const DEFAULT_FEED_NAME: &str = "Unnamed Feed";

/// Normalize a raw chart into a canonical feed
///
/// The input is only read; a fresh `CanonicalFeed` is returned.
pub fn normalize(raw: &RawFeed) -> FeedResult<CanonicalFeed> {
    let (weight, age, grid) = match (&raw.axes, &raw.grid) {
        (Some(axes), Some(grid)) => match (&axes.weight, &axes.age) {
            (Some(weight), Some(age)) => (weight, age, grid),
            _ => return Err(invalid_structure()),
        },
        _ => return Err(invalid_structure()),
    };

    let weight_unit = parse_axis_unit(weight, Axis::Weight, "kg", WeightUnit::from_str)?;
    let weight_axis_kg: Vec<f64> = weight
        .values
        .iter()
        .map(|&v| weight_unit.to_kg(v))
        .collect();
    check_axis(&weight_axis_kg, Axis::Weight)?;

    let age_unit = parse_axis_unit(age, Axis::Age, "days", AgeUnit::from_str)?;
    let age_axis_days: Vec<f64> = age.values.iter().map(|&v| age_unit.to_days(v)).collect();
    check_axis(&age_axis_days, Axis::Age)?;

    let (value_unit, grid_g_per_day) = convert_grid(grid, raw.cup_grams())?;
    check_dimensions(&grid_g_per_day, age_axis_days.len(), weight_axis_kg.len())?;
    check_positive(&grid_g_per_day)?;

    let presentation = Presentation {
        orientation: raw.orientation(),
        weight: PresentedAxis {
            unit: weight_unit,
            values: weight.values.clone(),
            label: weight.label_text(),
        },
        age: PresentedAxis {
            unit: age_unit,
            values: age.values.clone(),
            label: age.label_text(),
        },
        value_unit,
        cup_grams: raw.cup_grams(),
    };

    let identity = FeedIdentity {
        name: raw
            .name_text()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FEED_NAME.to_string()),
        id: raw.id.clone(),
        source: raw.source.clone(),
        version: raw.version.clone(),
        last_updated: raw.last_updated.clone(),
    };

    tracing::debug!(
        "Normalized feed '{}': {} weights x {} ages ({} -> g/day)",
        identity.name,
        weight_axis_kg.len(),
        age_axis_days.len(),
        value_unit.as_str()
    );

    Ok(CanonicalFeed::from_validated(
        identity,
        weight_axis_kg,
        age_axis_days,
        grid_g_per_day,
        presentation,
    ))
}

fn invalid_structure() -> FeedError {
    FeedError::InvalidFeed {
        reason: "Missing required feed structure".to_string(),
    }
}

/// Resolve an axis unit, falling back to the canonical one when omitted
fn parse_axis_unit<U>(
    axis: &RawAxis,
    which: Axis,
    default: &str,
    parse: fn(&str) -> Option<U>,
) -> FeedResult<U> {
    let unit = axis.unit_or(default);
    parse(&unit).ok_or(FeedError::InvalidAxisValues {
        axis: which,
        problem: AxisProblem::UnsupportedUnit { unit },
    })
}

/// Non-empty, and every value strictly greater than the one before it
fn check_axis(values: &[f64], which: Axis) -> FeedResult<()> {
    if values.is_empty() {
        return Err(FeedError::InvalidAxisValues {
            axis: which,
            problem: AxisProblem::Empty,
        });
    }
    // Written as a negation so NaN also fails
    if let Some(index) = values.windows(2).position(|pair| !(pair[1] > pair[0])) {
        return Err(FeedError::InvalidAxisValues {
            axis: which,
            problem: AxisProblem::NotAscending { index: index + 1 },
        });
    }
    Ok(())
}

fn convert_grid(
    grid: &RawGrid,
    cup_grams: Option<f64>,
) -> FeedResult<(ValueUnit, Vec<Vec<Option<f64>>>)> {
    let unit_str = grid.unit_or("g/day");
    let unit = ValueUnit::from_str(&unit_str)
        .ok_or(FeedError::UnsupportedValueUnit { unit: unit_str })?;
    let factor = unit
        .grams_factor(cup_grams)
        .ok_or(FeedError::MissingCupGrams)?;

    let converted = grid
        .values
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| match unit {
                    ValueUnit::GramsPerDay => *cell,
                    _ => cell.map(|v| v * factor),
                })
                .collect()
        })
        .collect();

    Ok((unit, converted))
}

fn check_dimensions(grid: &[Vec<Option<f64>>], ages: usize, weights: usize) -> FeedResult<()> {
    if grid.len() != ages {
        return Err(FeedError::MatrixDimMismatch {
            row: None,
            expected: ages,
            actual: grid.len(),
        });
    }
    if let Some((row, cells)) = grid.iter().enumerate().find(|(_, r)| r.len() != weights) {
        return Err(FeedError::MatrixDimMismatch {
            row: Some(row),
            expected: weights,
            actual: cells.len(),
        });
    }
    Ok(())
}

fn check_positive(grid: &[Vec<Option<f64>>]) -> FeedResult<()> {
    for (age_index, row) in grid.iter().enumerate() {
        for (weight_index, cell) in row.iter().enumerate() {
            if let Some(value) = *cell {
                if !(value > 0.0) {
                    return Err(FeedError::NonPositiveValues {
                        age_index,
                        weight_index,
                        value,
                    });
                }
            }
        }
    }
    Ok(())
}
