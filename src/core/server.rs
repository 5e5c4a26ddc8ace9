//! Gateway server handle.
//!
//! `McpServer` ties the read-only tool registry and the dispatcher to the
//! transports. Both the streaming and direct channels call through this
//! handle; neither owns any tool state of its own.

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::domains::tools::definitions::builtin_registry;
use crate::domains::tools::{Dispatcher, ResponseEnvelope, ToolCallRequest, ToolRegistry};

use super::config::Config;
use super::error::Result;

/// The gateway server handle shared across transports.
#[derive(Clone)]
pub struct McpServer {
    config: Arc<Config>,
    registry: Arc<ToolRegistry>,
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a server with the builtin tools registered.
    ///
    /// Registration happens exactly once, here; the registry is read-only
    /// for the rest of the process lifetime.
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let registry = Arc::new(builtin_registry()?);
        let dispatcher = Dispatcher::new(registry.clone(), config.clone());

        Ok(Self {
            config,
            registry,
            dispatcher,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.registry.len()
    }

    /// List all available tools as `tools/list` metadata objects.
    pub fn list_tools(&self) -> Vec<Value> {
        self.registry
            .definitions()
            .map(|definition| {
                json!({
                    "name": definition.name(),
                    "description": definition.description(),
                    "inputSchema": definition.schema().to_json_schema(),
                })
            })
            .collect()
    }

    /// Call a tool by name. Always yields an envelope; failures are
    /// folded into its text content by the dispatcher.
    pub async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> ResponseEnvelope {
        self.dispatcher
            .dispatch(ToolCallRequest {
                tool_name: name.to_string(),
                arguments,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> McpServer {
        McpServer::new(Config::default()).unwrap()
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_list_tools_metadata() {
        let tools = server().list_tools();
        assert_eq!(tools.len(), 6);
        assert_eq!(tools[0]["name"], json!("add"));
        assert_eq!(tools[0]["inputSchema"]["type"], json!("object"));
    }

    #[tokio::test]
    async fn test_call_tool_add() {
        let envelope = server().call_tool("add", args(json!({"a": 2, "b": 3}))).await;
        assert_eq!(envelope.content[0].text, "5");
    }

    #[tokio::test]
    async fn test_every_tool_lists_a_schema() {
        for tool in server().list_tools() {
            assert!(tool["inputSchema"]["properties"].is_object());
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_still_yields_envelope() {
        let envelope = server().call_tool("missing", Map::new()).await;
        assert_eq!(envelope.content.len(), 1);
    }
}
