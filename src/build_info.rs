//! Build and startup information
//!
//! What the running server was built from and which feeding defaults it
//! starts with.

use serde::Serialize;

use crate::config::Settings;
use crate::models::RawFeed;
use crate::tools::feeds::BUNDLED_SAMPLE_FEED;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compile time in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("PUPFEED_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Build information for the status tool
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_timestamp: &'static str,
    /// Name of the chart compiled into the binary
    pub bundled_sample: String,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            build_timestamp: BUILD_TIMESTAMP,
            bundled_sample: bundled_sample_name(),
        }
    }
}

fn bundled_sample_name() -> String {
    RawFeed::from_json_str(BUNDLED_SAMPLE_FEED)
        .ok()
        .and_then(|raw| raw.name_text())
        .unwrap_or_else(|| "unnamed chart".to_string())
}

/// Where `sample_feed` reads its chart from
pub fn sample_feed_source(settings: &Settings, info: &BuildInfo) -> String {
    match &settings.sample_feed_path {
        Some(path) => path.display().to_string(),
        None => format!("bundled ({})", info.bundled_sample),
    }
}

/// Startup banner, written to stderr by the server
pub fn startup_banner(settings: &Settings) -> String {
    let info = BuildInfo::current();
    [
        "===============================================".to_string(),
        format!("  Puppy Feeding Calculator v{}", info.version),
        format!("  Compiled: {}", info.build_timestamp),
        format!(
            "  Rounding: {} g | Weights in: {}",
            settings.rounding_step,
            settings.unit_system.weight_unit().as_str()
        ),
        format!("  Sample feed: {}", sample_feed_source(settings, &info)),
        "===============================================".to_string(),
    ]
    .join("\n")
}
