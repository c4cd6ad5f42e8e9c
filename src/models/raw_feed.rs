//! Raw feed model
//!
//! A feeding chart as imported from a file, pasted table or bundled sample.
//! Nothing about it is trusted until it has been normalized. Only the axes and
//! the grid are structural; every other field is read leniently so that odd
//! metadata never rejects an otherwise usable chart.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::feeding::{FeedError, FeedResult};
use super::Orientation;

/// One axis as supplied by the manufacturer chart
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAxis {
    pub unit: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub values: Vec<f64>,
    pub label: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAxes {
    pub weight: Option<RawAxis>,
    pub age: Option<RawAxis>,
}

/// Feeding amounts, `null` marks a cell the chart leaves empty
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGrid {
    pub unit: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub values: Vec<Vec<Option<f64>>>,
}

/// An imported feeding chart
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFeed {
    pub name: Option<Value>,
    pub id: Option<Value>,
    pub source: Option<Value>,
    pub version: Option<Value>,
    pub last_updated: Option<Value>,
    pub cup_grams: Option<Value>,
    pub axes: Option<RawAxes>,
    pub grid: Option<RawGrid>,
    pub presentation: Option<Value>,
}

/// `null` lists read as empty ones
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Text of a loosely typed field; null, false, 0 and "" count as unset
fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

impl RawAxis {
    /// Unit name, `default` when the chart leaves it unset
    pub fn unit_or(&self, default: &str) -> String {
        text_of(self.unit.as_ref()).unwrap_or_else(|| default.to_string())
    }

    pub fn label_text(&self) -> Option<String> {
        text_of(self.label.as_ref())
    }
}

impl RawGrid {
    pub fn unit_or(&self, default: &str) -> String {
        text_of(self.unit.as_ref()).unwrap_or_else(|| default.to_string())
    }
}

impl RawFeed {
    /// Interpret an arbitrary JSON value as a raw feed
    ///
    /// Anything that is not an object, or whose axes or grid have the wrong
    /// shape, is reported as `INVALID_FEED`.
    pub fn from_json(value: Value) -> FeedResult<Self> {
        if !value.is_object() {
            return Err(FeedError::InvalidFeed {
                reason: "Invalid feed object".to_string(),
            });
        }
        serde_json::from_value(value).map_err(|e| FeedError::InvalidFeed {
            reason: format!("Malformed feed structure: {}", e),
        })
    }

    pub fn from_json_str(s: &str) -> FeedResult<Self> {
        let value: Value = serde_json::from_str(s).map_err(|e| FeedError::InvalidFeed {
            reason: format!("Feed is not valid JSON: {}", e),
        })?;
        Self::from_json(value)
    }

    pub fn name_text(&self) -> Option<String> {
        text_of(self.name.as_ref())
    }

    /// Grams per cup, only when the chart gives it as a number
    pub fn cup_grams(&self) -> Option<f64> {
        self.cup_grams.as_ref().and_then(Value::as_f64)
    }

    /// Declared layout, the default one when missing or unrecognized
    pub fn orientation(&self) -> Orientation {
        self.presentation
            .as_ref()
            .and_then(|p| p.get("orientation"))
            .and_then(Value::as_str)
            .and_then(Orientation::from_str)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeding::FeedErrorKind;
    use serde_json::json;

    #[test]
    fn test_parse_chart_with_nulls() {
        let raw = RawFeed::from_json(json!({
            "name": "Chart",
            "cupGrams": 110,
            "lastUpdated": "2024-05-01",
            "axes": {
                "weight": { "unit": "lb", "values": [5, 10], "label": "Adult weight" },
                "age": { "unit": "months", "values": [2, 4] }
            },
            "grid": { "unit": "cup/day", "values": [[1.0, null], [1.5, 2.5]] },
            "presentation": { "orientation": "cols-age_rows-weight" }
        }))
        .unwrap();

        assert_eq!(raw.cup_grams(), Some(110.0));
        assert_eq!(raw.last_updated, Some(json!("2024-05-01")));
        assert_eq!(raw.orientation(), Orientation::ColsAgeRowsWeight);
        let grid = raw.grid.unwrap();
        assert_eq!(grid.values[0], vec![Some(1.0), None]);
        assert_eq!(grid.unit_or("g/day"), "cup/day");
        let weight = raw.axes.unwrap().weight.unwrap();
        assert_eq!(weight.label_text().as_deref(), Some("Adult weight"));
        assert_eq!(weight.unit_or("kg"), "lb");
    }

    #[test]
    fn test_non_object_is_invalid_feed() {
        for value in [json!(null), json!(42), json!("feed"), json!([1, 2])] {
            let err = RawFeed::from_json(value).unwrap_err();
            assert_eq!(err.kind(), FeedErrorKind::InvalidFeed);
        }
    }

    #[test]
    fn test_wrong_axis_types_are_invalid_feed() {
        let err = RawFeed::from_json(json!({ "axes": { "weight": { "values": "1,2" } } }))
            .unwrap_err();
        assert_eq!(err.kind(), FeedErrorKind::InvalidFeed);

        let err = RawFeed::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.kind(), FeedErrorKind::InvalidFeed);
    }

    #[test]
    fn test_missing_sections_parse_as_none() {
        let raw = RawFeed::from_json(json!({ "name": "Empty" })).unwrap();
        assert!(raw.axes.is_none());
        assert!(raw.grid.is_none());
    }

    #[test]
    fn test_metadata_of_any_type_is_accepted() {
        let raw = RawFeed::from_json(json!({
            "name": 7,
            "id": 1700000000,
            "source": ["brand", "site"],
            "lastUpdated": 20240501,
            "cupGrams": "100",
            "presentation": { "orientation": "rows-weight" }
        }))
        .unwrap();
        assert_eq!(raw.id, Some(json!(1700000000)));
        assert_eq!(raw.name_text().as_deref(), Some("7"));
        assert_eq!(raw.cup_grams(), None);
        assert_eq!(raw.orientation(), Orientation::ColsWeightRowsAge);

        let raw = RawFeed::from_json(json!({ "presentation": "compact" })).unwrap();
        assert_eq!(raw.orientation(), Orientation::ColsWeightRowsAge);
    }

    #[test]
    fn test_null_values_read_as_empty() {
        let raw = RawFeed::from_json(json!({
            "axes": { "weight": { "values": null }, "age": { "unit": null } },
            "grid": { "values": null }
        }))
        .unwrap();
        let axes = raw.axes.unwrap();
        assert!(axes.weight.unwrap().values.is_empty());
        let age = axes.age.unwrap();
        assert!(age.values.is_empty());
        assert_eq!(age.unit_or("days"), "days");
        assert!(raw.grid.unwrap().values.is_empty());
    }

    #[test]
    fn test_falsy_units_fall_back_to_default() {
        let unit_of = |unit: Value| RawAxis {
            unit: Some(unit),
            ..Default::default()
        };
        assert_eq!(unit_of(json!("")).unit_or("kg"), "kg");
        assert_eq!(unit_of(json!(0)).unit_or("kg"), "kg");
        assert_eq!(unit_of(json!(false)).unit_or("kg"), "kg");
        assert_eq!(unit_of(json!(12)).unit_or("kg"), "12");
    }
}
