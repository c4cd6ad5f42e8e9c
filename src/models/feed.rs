//! Canonical feed model
//!
//! A validated feeding chart in kilograms, days and grams per day. Instances
//! are only produced by the normalizer and are never edited afterwards.

use serde::Serialize;
use serde_json::Value;

use crate::feeding::units::{AgeUnit, ValueUnit, WeightUnit};
use super::RangeBounds;

/// How the chart was laid out by the manufacturer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Orientation {
    #[default]
    #[serde(rename = "cols-weight_rows-age")]
    ColsWeightRowsAge,
    #[serde(rename = "cols-age_rows-weight")]
    ColsAgeRowsWeight,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::ColsWeightRowsAge => "cols-weight_rows-age",
            Orientation::ColsAgeRowsWeight => "cols-age_rows-weight",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cols-weight_rows-age" => Some(Orientation::ColsWeightRowsAge),
            "cols-age_rows-weight" => Some(Orientation::ColsAgeRowsWeight),
            _ => None,
        }
    }
}

/// An axis as the manufacturer printed it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentedAxis<U> {
    pub unit: U,
    pub values: Vec<f64>,
    pub label: Option<String>,
}

/// Display-only metadata, never consulted by the interpolator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub orientation: Orientation,
    pub weight: PresentedAxis<WeightUnit>,
    pub age: PresentedAxis<AgeUnit>,
    pub value_unit: ValueUnit,
    pub cup_grams: Option<f64>,
}

/// A feeding chart in canonical units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalFeed {
    name: String,
    id: Option<Value>,
    source: Option<Value>,
    version: Option<Value>,
    last_updated: Option<Value>,
    weight_axis_kg: Vec<f64>,
    age_axis_days: Vec<f64>,
    /// `grid[age_index][weight_index]`
    grid_g_per_day: Vec<Vec<Option<f64>>>,
    presentation: Presentation,
}

/// Identity and provenance copied from the import
#[derive(Debug, Clone, Default)]
pub(crate) struct FeedIdentity {
    pub name: String,
    pub id: Option<Value>,
    pub source: Option<Value>,
    pub version: Option<Value>,
    pub last_updated: Option<Value>,
}

impl CanonicalFeed {
    /// Assemble a feed from already-validated parts
    pub(crate) fn from_validated(
        identity: FeedIdentity,
        weight_axis_kg: Vec<f64>,
        age_axis_days: Vec<f64>,
        grid_g_per_day: Vec<Vec<Option<f64>>>,
        presentation: Presentation,
    ) -> Self {
        Self {
            name: identity.name,
            id: identity.id,
            source: identity.source,
            version: identity.version,
            last_updated: identity.last_updated,
            weight_axis_kg,
            age_axis_days,
            grid_g_per_day,
            presentation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    pub fn source(&self) -> Option<&Value> {
        self.source.as_ref()
    }

    pub fn version(&self) -> Option<&Value> {
        self.version.as_ref()
    }

    pub fn last_updated(&self) -> Option<&Value> {
        self.last_updated.as_ref()
    }

    /// Weight breakpoints in kilograms, strictly ascending
    pub fn weight_axis(&self) -> &[f64] {
        &self.weight_axis_kg
    }

    /// Age breakpoints in days, strictly ascending
    pub fn age_axis(&self) -> &[f64] {
        &self.age_axis_days
    }

    /// Rows are ages, columns are weights
    pub fn grid(&self) -> &[Vec<Option<f64>>] {
        &self.grid_g_per_day
    }

    /// Grams per day at a grid coordinate, `None` for absent or out-of-grid cells
    pub fn cell(&self, age_index: usize, weight_index: usize) -> Option<f64> {
        self.grid_g_per_day
            .get(age_index)
            .and_then(|row| row.get(weight_index))
            .copied()
            .flatten()
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// First and last breakpoint of both axes
    pub fn bounds(&self) -> RangeBounds {
        // Both axes are non-empty after normalization
        let first = |axis: &[f64]| axis.first().copied().unwrap_or(f64::NAN);
        let last = |axis: &[f64]| axis.last().copied().unwrap_or(f64::NAN);
        RangeBounds {
            age_min: first(&self.age_axis_days),
            age_max: last(&self.age_axis_days),
            w_min: first(&self.weight_axis_kg),
            w_max: last(&self.weight_axis_kg),
        }
    }

    /// The grid expressed in the chart's original value unit
    pub fn display_grid(&self) -> Vec<Vec<Option<f64>>> {
        let unit = self.presentation.value_unit;
        let cup_grams = self.presentation.cup_grams;
        self.grid_g_per_day
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.and_then(|g| unit.from_grams_per_day(g, cup_grams)))
                    .collect()
            })
            .collect()
    }
}
