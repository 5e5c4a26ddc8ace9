//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the gateway:
//! error handling, configuration, the authentication gate, the server
//! handle, and the HTTP transport layer.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use auth::ApiKeyGate;
pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::HttpTransport;
