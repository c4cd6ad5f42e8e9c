//! Feeding MCP Server Implementation
//!
//! Exposes the feeding tools over the Model Context Protocol.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::tools::feeds::{self, ComputeDailyRequest};
use crate::tools::status::StatusTracker;

/// Feeding MCP Service
#[derive(Clone)]
pub struct FeedService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    settings: Arc<Settings>,
    tool_router: ToolRouter<FeedService>,
}

impl FeedService {
    pub fn new(settings: Settings) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(settings.clone()))),
            settings: Arc::new(settings),
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FeedParams {
    /// Feeding chart: {name?, cupGrams?, axes: {weight: {unit, values}, age: {unit, values}}, grid: {unit, values}}
    pub feed: serde_json::Value,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ComputeDailyParams {
    /// Feeding chart in the same shape accepted by normalize_feed
    pub feed: serde_json::Value,
    /// Puppy body weight
    pub weight: f64,
    /// Unit of weight: kg or lb (defaults to the configured unit system)
    pub weight_unit: Option<String>,
    /// Puppy age in days
    pub age_days: Option<f64>,
    /// Birth date (YYYY-MM-DD), used when age_days is not given
    pub birth_date: Option<String>,
    /// Rounding step in grams (defaults to the configured step)
    pub rounding_step: Option<u32>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl FeedService {
    #[tool(description = "Get the current status of the feeding service including build info, settings, and process information")]
    async fn feed_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json_result(&tracker.get_status())
    }

    #[tool(description = "Get instructions for describing feeding charts and computing daily amounts. Call this before using the other feeding tools.")]
    fn feeding_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::FEEDING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(FEEDING_INSTRUCTIONS)]))
    }

    #[tool(description = "Validate a feeding chart and convert it to canonical units (kg, days, g/day). Returns the normalized chart or an error with a diagnosis code.")]
    fn normalize_feed(&self, Parameters(p): Parameters<FeedParams>) -> Result<CallToolResult, McpError> {
        to_json_result(&feeds::normalize_feed(p.feed))
    }

    #[tool(description = "Compute the recommended daily food amount, portions per day and grams per portion for a puppy from a feeding chart")]
    fn compute_daily(&self, Parameters(p): Parameters<ComputeDailyParams>) -> Result<CallToolResult, McpError> {
        let request = ComputeDailyRequest {
            feed: p.feed,
            weight: p.weight,
            weight_unit: p.weight_unit,
            age_days: p.age_days,
            birth_date: p.birth_date,
            rounding_step: p.rounding_step,
        };
        let result = feeds::compute_daily(&self.settings, request)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get the bundled sample feeding chart, normalized")]
    fn sample_feed(&self) -> Result<CallToolResult, McpError> {
        let result = feeds::sample_feed(&self.settings).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Show a feeding chart's grid in the units the manufacturer printed it in")]
    fn display_feed(&self, Parameters(p): Parameters<FeedParams>) -> Result<CallToolResult, McpError> {
        to_json_result(&feeds::display_feed(p.feed))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for FeedService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pupfeed".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Puppy Feeding Calculator".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Puppy Feeding Calculator - daily food amounts from manufacturer feeding charts. \
                 IMPORTANT: Call feeding_instructions first. \
                 Charts: normalize_feed, display_feed, sample_feed. \
                 Feeding: compute_daily (weight + age_days or birth_date). \
                 Status: feed_status."
                    .into(),
            ),
        }
    }
}
