//! Runtime settings
//!
//! Read from `PUPFEED_*` environment variables at startup.

use std::num::NonZeroU32;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::feeding::units::WeightUnit;
use crate::feeding::DEFAULT_ROUNDING_STEP;

pub const ENV_ROUNDING_STEP: &str = "PUPFEED_ROUNDING_STEP";
pub const ENV_UNIT_SYSTEM: &str = "PUPFEED_UNIT_SYSTEM";
pub const ENV_SAMPLE_FEED: &str = "PUPFEED_SAMPLE_FEED";

/// Configuration error types
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("PUPFEED_ROUNDING_STEP must be a positive integer, got '{0}'")]
    InvalidRoundingStep(String),

    #[error("PUPFEED_UNIT_SYSTEM must be 'metric' or 'imperial', got '{0}'")]
    InvalidUnitSystem(String),
}

/// Unit system the user enters weights in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Some(UnitSystem::Metric),
            "imperial" => Some(UnitSystem::Imperial),
            _ => None,
        }
    }

    /// Unit of body weights entered by the user
    pub fn weight_unit(&self) -> WeightUnit {
        match self {
            UnitSystem::Metric => WeightUnit::Kg,
            UnitSystem::Imperial => WeightUnit::Lb,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub rounding_step: NonZeroU32,
    pub unit_system: UnitSystem,
    /// Overrides the bundled sample feed when set
    pub sample_feed_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rounding_step: DEFAULT_ROUNDING_STEP,
            unit_system: UnitSystem::default(),
            sample_feed_path: None,
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_ROUNDING_STEP) {
            settings.rounding_step = raw
                .trim()
                .parse::<NonZeroU32>()
                .map_err(|_| ConfigError::InvalidRoundingStep(raw.clone()))?;
        }

        if let Some(raw) = lookup(ENV_UNIT_SYSTEM) {
            settings.unit_system =
                UnitSystem::from_str(&raw).ok_or(ConfigError::InvalidUnitSystem(raw))?;
        }

        settings.sample_feed_path = lookup(ENV_SAMPLE_FEED)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.rounding_step.get(), 5);
        assert_eq!(settings.unit_system, UnitSystem::Metric);
        assert_eq!(settings.sample_feed_path, None);
    }

    #[test]
    fn test_overrides() {
        let settings = load(&[
            (ENV_ROUNDING_STEP, " 10 "),
            (ENV_UNIT_SYSTEM, "Imperial"),
            (ENV_SAMPLE_FEED, "/tmp/feed.json"),
        ])
        .unwrap();
        assert_eq!(settings.rounding_step.get(), 10);
        assert_eq!(settings.unit_system.weight_unit(), WeightUnit::Lb);
        assert_eq!(settings.sample_feed_path, Some(PathBuf::from("/tmp/feed.json")));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert_eq!(
            load(&[(ENV_ROUNDING_STEP, "0")]).unwrap_err(),
            ConfigError::InvalidRoundingStep("0".to_string())
        );
        assert!(load(&[(ENV_ROUNDING_STEP, "2.5")]).is_err());
        assert_eq!(
            load(&[(ENV_UNIT_SYSTEM, "nautical")]).unwrap_err(),
            ConfigError::InvalidUnitSystem("nautical".to_string())
        );
    }
}
