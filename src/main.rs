//! MCP Server Entry Point
//!
//! Loads configuration, initializes logging, builds the tool gateway, and
//! starts the HTTP transport. A missing server API key is fatal here,
//! before any request is served.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use flink_mcp_server::core::transport::HttpTransport;
use flink_mcp_server::core::{Config, McpServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment; fails without MCP_API_KEY
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    // Build the gateway (registers the builtin tools exactly once)
    let server = McpServer::new(config.clone())?;

    info!("Server initialized with {} tools", server.tool_count());

    // Run the HTTP transport (direct JSON-RPC + SSE streaming)
    let transport = HttpTransport::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
