//! Feeding diagnoses
//!
//! Every failure of the engine is an input-data or query diagnosis. Each one
//! carries a stable machine-readable code plus the metadata a caller needs to
//! render a precise message.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::{CellRef, RangeBounds};

/// Which axis a diagnosis refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Weight,
    Age,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Weight => "weight",
            Axis::Age => "age",
        }
    }
}

/// Why an axis was rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AxisProblem {
    UnsupportedUnit { unit: String },
    Empty,
    NotAscending { index: usize },
}

/// Feeding engine diagnosis
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    #[error("Invalid feed: {reason}")]
    InvalidFeed { reason: String },

    #[error("Invalid {} axis: {}", axis.as_str(), describe_axis_problem(problem))]
    InvalidAxisValues { axis: Axis, problem: AxisProblem },

    #[error("cupGrams must be a positive number for cup/day values")]
    MissingCupGrams,

    #[error("Unsupported value unit: {unit}")]
    UnsupportedValueUnit { unit: String },

    #[error("{}", describe_dim_mismatch(*row, *expected, *actual))]
    MatrixDimMismatch {
        /// Offending row, `None` when the row count itself is wrong
        row: Option<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("Non-positive value at age index {age_index}, weight index {weight_index}: {value}")]
    NonPositiveValues {
        age_index: usize,
        weight_index: usize,
        value: f64,
    },

    #[error(
        "Input outside feed range (weight {} - {} kg, age {} - {} days)",
        bounds.w_min, bounds.w_max, bounds.age_min, bounds.age_max
    )]
    OutOfRange { bounds: RangeBounds },

    #[error("Required data cells contain no value: {}", describe_cells(cells))]
    MissingData { cells: Vec<CellRef> },
}

/// Result type for feeding engine operations
pub type FeedResult<T> = Result<T, FeedError>;

/// Stable diagnosis code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedErrorKind {
    InvalidFeed,
    InvalidAxisValues,
    MissingCupGrams,
    UnsupportedValueUnit,
    MatrixDimMismatch,
    NonPositiveValues,
    OutOfRange,
    MissingData,
}

impl FeedErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedErrorKind::InvalidFeed => "INVALID_FEED",
            FeedErrorKind::InvalidAxisValues => "INVALID_AXIS_VALUES",
            FeedErrorKind::MissingCupGrams => "MISSING_CUP_GRAMS",
            FeedErrorKind::UnsupportedValueUnit => "UNSUPPORTED_VALUE_UNIT",
            FeedErrorKind::MatrixDimMismatch => "MATRIX_DIM_MISMATCH",
            FeedErrorKind::NonPositiveValues => "NON_POSITIVE_VALUES",
            FeedErrorKind::OutOfRange => "OUT_OF_RANGE",
            FeedErrorKind::MissingData => "MISSING_DATA",
        }
    }
}

/// Serializable form of a diagnosis, handed verbatim to callers
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub code: FeedErrorKind,
    pub message: String,
    pub meta: Value,
}

impl FeedError {
    pub fn kind(&self) -> FeedErrorKind {
        match self {
            FeedError::InvalidFeed { .. } => FeedErrorKind::InvalidFeed,
            FeedError::InvalidAxisValues { .. } => FeedErrorKind::InvalidAxisValues,
            FeedError::MissingCupGrams => FeedErrorKind::MissingCupGrams,
            FeedError::UnsupportedValueUnit { .. } => FeedErrorKind::UnsupportedValueUnit,
            FeedError::MatrixDimMismatch { .. } => FeedErrorKind::MatrixDimMismatch,
            FeedError::NonPositiveValues { .. } => FeedErrorKind::NonPositiveValues,
            FeedError::OutOfRange { .. } => FeedErrorKind::OutOfRange,
            FeedError::MissingData { .. } => FeedErrorKind::MissingData,
        }
    }

    /// Structured metadata for building a message without re-deriving it
    pub fn meta(&self) -> Value {
        match self {
            FeedError::InvalidFeed { reason } => json!({ "reason": reason }),
            FeedError::InvalidAxisValues { axis, problem } => {
                let mut meta = json!({ "axis": axis });
                if let (Value::Object(map), Ok(Value::Object(extra))) =
                    (&mut meta, serde_json::to_value(problem))
                {
                    map.extend(extra);
                }
                meta
            }
            FeedError::MissingCupGrams => json!({}),
            FeedError::UnsupportedValueUnit { unit } => json!({ "unit": unit }),
            FeedError::MatrixDimMismatch { row, expected, actual } => json!({
                "row": row,
                "expected": expected,
                "actual": actual,
            }),
            FeedError::NonPositiveValues { age_index, weight_index, value } => json!({
                "ageIndex": age_index,
                "weightIndex": weight_index,
                "value": value,
            }),
            FeedError::OutOfRange { bounds } => json!({
                "ageMin": bounds.age_min,
                "ageMax": bounds.age_max,
                "wMin": bounds.w_min,
                "wMax": bounds.w_max,
            }),
            FeedError::MissingData { cells } => json!({ "cells": cells }),
        }
    }

    pub fn diagnosis(&self) -> Diagnosis {
        Diagnosis {
            code: self.kind(),
            message: self.to_string(),
            meta: self.meta(),
        }
    }
}

fn describe_axis_problem(problem: &AxisProblem) -> String {
    match problem {
        AxisProblem::UnsupportedUnit { unit } => format!("unsupported unit '{}'", unit),
        AxisProblem::Empty => "axis is empty".to_string(),
        AxisProblem::NotAscending { index } => {
            format!("value at index {} is not strictly greater than its predecessor", index)
        }
    }
}

fn describe_dim_mismatch(row: Option<usize>, expected: usize, actual: usize) -> String {
    match row {
        Some(row) => format!(
            "Matrix row {} column count ({}) does not match weight axis length ({})",
            row, actual, expected
        ),
        None => format!(
            "Matrix row count ({}) does not match age axis length ({})",
            actual, expected
        ),
    }
}

fn describe_cells(cells: &[CellRef]) -> String {
    cells
        .iter()
        .map(|c| format!("(age {}, weight {})", c.age_index, c.weight_index))
        .collect::<Vec<_>>()
        .join(", ")
}
