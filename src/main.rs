//! Puppy Feeding Calculator
//!
//! An MCP server computing daily feeding amounts from manufacturer charts.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use pupfeed::build_info;
use pupfeed::config::Settings;
use pupfeed::mcp::FeedService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr so stdout stays free for MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pupfeed=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_env()?;
    eprintln!("{}", build_info::startup_banner(&settings));

    tracing::info!("Starting MCP server on stdio");
    let service = FeedService::new(settings);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
