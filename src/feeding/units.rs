//! Unit types and conversion constants
//!
//! Units accepted in manufacturer feeding charts and their factors to the
//! canonical units (kilograms, days, grams per day).

use serde::{Deserialize, Serialize};

// ============================================================================
// Conversion Constants (to canonical units)
// ============================================================================

/// Kilograms per pound (exact, international avoirdupois pound)
pub const KG_PER_LB: f64 = 0.45359237;
/// Days per week
pub const DAYS_PER_WEEK: f64 = 7.0;
/// Days per month (mean Gregorian month, also used for portion thresholds)
pub const DAYS_PER_MONTH: f64 = 30.4375;
/// Grams per ounce (exact)
pub const G_PER_OZ: f64 = 28.349523125;

// ============================================================================
// Weight Axis Units
// ============================================================================

/// Unit of the body weight axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lb,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "kg" => Some(WeightUnit::Kg),
            "lb" => Some(WeightUnit::Lb),
            _ => None,
        }
    }

    /// Factor that converts a value in this unit to kilograms
    pub fn kg_factor(&self) -> f64 {
        match self {
            WeightUnit::Kg => 1.0,
            WeightUnit::Lb => KG_PER_LB,
        }
    }

    /// Convert a value in this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            _ => value * self.kg_factor(),
        }
    }

    /// Convert kilograms back to this unit (for display)
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            _ => kg / self.kg_factor(),
        }
    }
}

// ============================================================================
// Age Axis Units
// ============================================================================

/// Unit of the age axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeUnit {
    Days,
    Weeks,
    Months,
}

impl AgeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeUnit::Days => "days",
            AgeUnit::Weeks => "weeks",
            AgeUnit::Months => "months",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "days" => Some(AgeUnit::Days),
            "weeks" => Some(AgeUnit::Weeks),
            "months" => Some(AgeUnit::Months),
            _ => None,
        }
    }

    pub fn days_factor(&self) -> f64 {
        match self {
            AgeUnit::Days => 1.0,
            AgeUnit::Weeks => DAYS_PER_WEEK,
            AgeUnit::Months => DAYS_PER_MONTH,
        }
    }

    /// Convert a value in this unit to days
    pub fn to_days(&self, value: f64) -> f64 {
        match self {
            AgeUnit::Days => value,
            _ => value * self.days_factor(),
        }
    }

    /// Convert days back to this unit (for display)
    pub fn from_days(&self, days: f64) -> f64 {
        match self {
            AgeUnit::Days => days,
            _ => days / self.days_factor(),
        }
    }
}

// ============================================================================
// Grid Value Units
// ============================================================================

/// Unit of the daily feeding amounts in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueUnit {
    #[serde(rename = "g/day")]
    GramsPerDay,
    #[serde(rename = "oz/day")]
    OuncesPerDay,
    /// Requires the feed's grams-per-cup to convert
    #[serde(rename = "cup/day")]
    CupsPerDay,
}

impl ValueUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueUnit::GramsPerDay => "g/day",
            ValueUnit::OuncesPerDay => "oz/day",
            ValueUnit::CupsPerDay => "cup/day",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "g/day" => Some(ValueUnit::GramsPerDay),
            "oz/day" => Some(ValueUnit::OuncesPerDay),
            "cup/day" => Some(ValueUnit::CupsPerDay),
            _ => None,
        }
    }

    /// Grams per unit amount, `None` for cups without a known cup weight
    pub fn grams_factor(&self, cup_grams: Option<f64>) -> Option<f64> {
        match self {
            ValueUnit::GramsPerDay => Some(1.0),
            ValueUnit::OuncesPerDay => Some(G_PER_OZ),
            ValueUnit::CupsPerDay => cup_grams.filter(|g| g.is_finite() && *g > 0.0),
        }
    }

    /// Convert grams per day back to this unit (for display)
    pub fn from_grams_per_day(&self, grams: f64, cup_grams: Option<f64>) -> Option<f64> {
        match self {
            ValueUnit::GramsPerDay => Some(grams),
            _ => self.grams_factor(cup_grams).map(|factor| grams / factor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_unit_parsing() {
        assert_eq!(WeightUnit::from_str("kg"), Some(WeightUnit::Kg));
        assert_eq!(WeightUnit::from_str("lb"), Some(WeightUnit::Lb));
        assert_eq!(WeightUnit::from_str("stone"), None);
    }

    #[test]
    fn test_age_unit_parsing() {
        assert_eq!(AgeUnit::from_str("days"), Some(AgeUnit::Days));
        assert_eq!(AgeUnit::from_str("weeks"), Some(AgeUnit::Weeks));
        assert_eq!(AgeUnit::from_str("months"), Some(AgeUnit::Months));
        assert_eq!(AgeUnit::from_str("years"), None);
        assert_eq!(AgeUnit::from_str("day"), None);
    }

    #[test]
    fn test_value_unit_parsing() {
        assert_eq!(ValueUnit::from_str("g/day"), Some(ValueUnit::GramsPerDay));
        assert_eq!(ValueUnit::from_str("oz/day"), Some(ValueUnit::OuncesPerDay));
        assert_eq!(ValueUnit::from_str("cup/day"), Some(ValueUnit::CupsPerDay));
        assert_eq!(ValueUnit::from_str("kcal/day"), None);
    }

    #[test]
    fn test_unit_names_are_exact() {
        for unit in ["KG", "Kg", " kg", "pounds", "lbs"] {
            assert_eq!(WeightUnit::from_str(unit), None, "{}", unit);
        }
        for unit in ["Days", "d", "wk", "mo", "month"] {
            assert_eq!(AgeUnit::from_str(unit), None, "{}", unit);
        }
        for unit in ["g", "oz", "cup", "cups", "G/DAY", "cups/day"] {
            assert_eq!(ValueUnit::from_str(unit), None, "{}", unit);
        }
    }

    #[test]
    fn test_identity_conversions_are_exact() {
        let v = 0.1 + 0.2;
        assert_eq!(WeightUnit::Kg.to_kg(v), v);
        assert_eq!(AgeUnit::Days.to_days(v), v);
        assert_eq!(ValueUnit::GramsPerDay.from_grams_per_day(v, None), Some(v));
    }

    #[test]
    fn test_pound_round_trip() {
        for lb in [2.20462, 4.40924, 11.0, 55.5] {
            let kg = WeightUnit::Lb.to_kg(lb);
            assert!((kg / KG_PER_LB - lb).abs() < 1e-9);
            assert!((WeightUnit::Lb.from_kg(kg) - lb).abs() < 1e-9);
        }
    }

    #[test]
    fn test_age_conversions() {
        assert_eq!(AgeUnit::Weeks.to_days(4.0), 28.0);
        assert_eq!(AgeUnit::Months.to_days(2.0), 60.875);
        assert_eq!(AgeUnit::Months.to_days(4.0), 121.75);
        assert_eq!(AgeUnit::Months.from_days(121.75), 4.0);
    }

    #[test]
    fn test_cup_factor_requires_positive_cup_grams() {
        assert_eq!(ValueUnit::CupsPerDay.grams_factor(Some(100.0)), Some(100.0));
        assert_eq!(ValueUnit::CupsPerDay.grams_factor(None), None);
        assert_eq!(ValueUnit::CupsPerDay.grams_factor(Some(0.0)), None);
        assert_eq!(ValueUnit::CupsPerDay.grams_factor(Some(-5.0)), None);
        assert_eq!(ValueUnit::CupsPerDay.from_grams_per_day(150.0, Some(100.0)), Some(1.5));
    }

    #[test]
    fn test_ounce_conversion() {
        let g = ValueUnit::OuncesPerDay.grams_factor(None).unwrap() * 2.5;
        assert!((g - 70.8738078125).abs() < 1e-9);
    }
}
