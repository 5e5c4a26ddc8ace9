//! Flink MCP Server Library
//!
//! An MCP (Model Context Protocol) tool gateway gated by a shared-secret
//! API key. Tool calls arrive over one of two HTTP transports (an SSE
//! streaming channel or a plain JSON-RPC request/response channel), are
//! validated against each tool's declared schema, and always come back as
//! a uniform text-content envelope regardless of outcome.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the authentication gate,
//!   the server handle, and the HTTP/SSE transport layer
//! - **domains::tools**: the tool registry, argument validator, dispatcher,
//!   response normalizer, and the individual tool definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use flink_mcp_server::{Config, McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config)?;
//!     // Hand the server to the HTTP transport...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, McpServer, Result};
