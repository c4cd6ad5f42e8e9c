//! Feed MCP Tools
//!
//! Normalizing charts and computing daily amounts. Engine diagnoses are part
//! of a normal response so callers always receive the structured code;
//! `Err(String)` is reserved for malformed tool requests and I/O failures.

use std::num::NonZeroU32;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::config::Settings;
use crate::feeding::{
    self, age_in_days_today, parse_birth_date, Diagnosis, FeedResult, Query, WeightUnit,
};
use crate::models::{CanonicalFeed, FeedingResult, Orientation, RawFeed};

/// Chart bundled with the binary
pub const BUNDLED_SAMPLE_FEED: &str = include_str!("../../data/sample_feed.json");

/// Either a tool payload or the diagnosis that prevented it
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ToolOutcome<T> {
    Ok(T),
    Diagnosis { error: Diagnosis },
}

impl<T> ToolOutcome<T> {
    fn from_result(result: FeedResult<T>, context: &str) -> Self {
        match result {
            Ok(value) => ToolOutcome::Ok(value),
            Err(e) => {
                tracing::warn!("{} rejected: [{}] {}", context, e.kind().as_str(), e);
                ToolOutcome::Diagnosis { error: e.diagnosis() }
            }
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            ToolOutcome::Ok(value) => Some(value),
            ToolOutcome::Diagnosis { .. } => None,
        }
    }

    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        match self {
            ToolOutcome::Ok(_) => None,
            ToolOutcome::Diagnosis { error } => Some(error),
        }
    }
}

/// Parameters for compute_daily
#[derive(Debug, Clone, Default)]
pub struct ComputeDailyRequest {
    pub feed: Value,
    pub weight: f64,
    /// Unit of `weight`, defaults to the configured unit system
    pub weight_unit: Option<String>,
    pub age_days: Option<f64>,
    /// Used when `age_days` is not given
    pub birth_date: Option<String>,
    pub rounding_step: Option<u32>,
}

/// Response for compute_daily
#[derive(Debug, Serialize)]
pub struct ComputeDailyResponse {
    pub feed_name: String,
    pub weight_kg: f64,
    pub age_days: f64,
    pub rounding_step: u32,
    #[serde(flatten)]
    pub result: FeedingResult,
}

/// Response for display_feed
#[derive(Debug, Serialize)]
pub struct DisplayFeedResponse {
    pub name: String,
    pub orientation: Orientation,
    pub weight_unit: &'static str,
    pub weight_label: Option<String>,
    pub weights: Vec<f64>,
    pub age_unit: &'static str,
    pub age_label: Option<String>,
    pub ages: Vec<f64>,
    pub value_unit: &'static str,
    /// `values[age_index][weight_index]` in `value_unit`
    pub values: Vec<Vec<Option<f64>>>,
}

fn normalize_value(feed: Value) -> FeedResult<CanonicalFeed> {
    let raw = RawFeed::from_json(feed)?;
    feeding::normalize(&raw)
}

// ============================================================================
// Feed Tools
// ============================================================================

/// Normalize a raw chart into canonical units
pub fn normalize_feed(feed: Value) -> ToolOutcome<CanonicalFeed> {
    ToolOutcome::from_result(normalize_value(feed), "normalize_feed")
}

/// Normalize a chart and compute the daily amount for one puppy
pub fn compute_daily(
    settings: &Settings,
    request: ComputeDailyRequest,
) -> Result<ToolOutcome<ComputeDailyResponse>, String> {
    let weight_unit = match request.weight_unit.as_deref() {
        Some(unit) => WeightUnit::from_str(unit)
            .ok_or_else(|| format!("Unsupported weight unit: {}", unit))?,
        None => settings.unit_system.weight_unit(),
    };
    let weight_kg = weight_unit.to_kg(request.weight);
    if !(weight_kg > 0.0) {
        return Err(format!("Weight must be positive, got {}", request.weight));
    }

    let age_days = match (request.age_days, request.birth_date.as_deref()) {
        (Some(age), _) => age,
        (None, Some(birth)) => age_in_days_today(parse_birth_date(birth)?) as f64,
        (None, None) => return Err("Either age_days or birth_date is required".to_string()),
    };
    if !(age_days >= 0.0) {
        return Err(format!("Age must not be negative, got {} days", age_days));
    }

    let rounding_step = match request.rounding_step {
        Some(step) => NonZeroU32::new(step)
            .ok_or_else(|| "rounding_step must be a positive integer".to_string())?,
        None => settings.rounding_step,
    };

    let query = Query::new(weight_kg, age_days).with_rounding_step(rounding_step);
    let result = normalize_value(request.feed).and_then(|feed| {
        feeding::compute(&feed, &query).map(|result| ComputeDailyResponse {
            feed_name: feed.name().to_string(),
            weight_kg,
            age_days,
            rounding_step: rounding_step.get(),
            result,
        })
    });

    Ok(ToolOutcome::from_result(result, "compute_daily"))
}

/// Normalize the sample chart, from the configured path or the bundled copy
pub fn sample_feed(settings: &Settings) -> Result<ToolOutcome<CanonicalFeed>, String> {
    let text = match settings.sample_feed_path.as_deref() {
        Some(path) => read_feed_file(path)?,
        None => BUNDLED_SAMPLE_FEED.to_string(),
    };
    let result = RawFeed::from_json_str(&text).and_then(|raw| feeding::normalize(&raw));
    Ok(ToolOutcome::from_result(result, "sample_feed"))
}

/// Show a chart's grid in the units it was printed in
pub fn display_feed(feed: Value) -> ToolOutcome<DisplayFeedResponse> {
    let result = normalize_value(feed).map(|feed| {
        let presentation = feed.presentation();
        DisplayFeedResponse {
            name: feed.name().to_string(),
            orientation: presentation.orientation,
            weight_unit: presentation.weight.unit.as_str(),
            weight_label: presentation.weight.label.clone(),
            weights: feed
                .weight_axis()
                .iter()
                .map(|&kg| presentation.weight.unit.from_kg(kg))
                .collect(),
            age_unit: presentation.age.unit.as_str(),
            age_label: presentation.age.label.clone(),
            ages: feed
                .age_axis()
                .iter()
                .map(|&days| presentation.age.unit.from_days(days))
                .collect(),
            value_unit: presentation.value_unit.as_str(),
            values: feed.display_grid(),
        }
    });
    ToolOutcome::from_result(result, "display_feed")
}

/// Read a chart from disk
pub fn read_feed_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read feed file {}: {}", path.display(), e))
}
