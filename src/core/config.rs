//! Configuration management for the gateway.
//!
//! Configuration is loaded once at process start from environment
//! variables (prefixed with `MCP_`) and shared read-only afterwards.
//! The server API key is required: `from_env` fails without it so a
//! misconfigured process never starts serving.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{Error, Result};
use super::transport::HttpConfig;

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP transport configuration.
    pub transport: HttpConfig,

    /// API key credentials (server secret and external services).
    pub credentials: CredentialsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Shared secret clients must present on protected endpoints.
    /// Required; `Config::from_env` fails when it is absent.
    pub api_key: Option<String>,

    /// Firecrawl API key for the price extraction and product search
    /// tools. Optional; those tools report a configuration error text
    /// when it is missing.
    pub firecrawl_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field(
                "firecrawl_api_key",
                &self.firecrawl_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "flink-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: HttpConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `MCP_`, for example
    /// `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_API_KEY`.
    ///
    /// Returns a configuration error if `MCP_API_KEY` is unset or empty;
    /// the gateway refuses to start without its shared secret.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = HttpConfig::from_env();

        match std::env::var("MCP_API_KEY") {
            Ok(key) if !key.is_empty() => {
                config.credentials.api_key = Some(key);
            }
            _ => {
                return Err(Error::config(
                    "MCP_API_KEY must be set; refusing to serve without a shared secret",
                ));
            }
        }

        if let Ok(key) = std::env::var("MCP_FIRECRAWL_API_KEY") {
            config.credentials.firecrawl_api_key = Some(key);
            info!("Firecrawl API key loaded from environment");
        } else {
            warn!(
                "MCP_FIRECRAWL_API_KEY not set - the firecrawl_price_extract and \
                 firecrawl_find_product_url tools will report a configuration error"
            );
        }

        Ok(config)
    }
}
