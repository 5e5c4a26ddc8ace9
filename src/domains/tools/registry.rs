//! Tool Registry - central registration and lookup for all tools.
//!
//! The registry owns every [`ToolDefinition`]. It is populated exactly
//! once at server construction, then wrapped in an `Arc` and shared
//! read-only across concurrent requests; no handler can mutate another
//! tool's definition.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::core::config::Config;

use super::definitions::firecrawl::FirecrawlClient;
use super::error::ToolError;
use super::outcome::ToolOutcome;
use super::schema::InputSchema;

/// Boxed async tool handler.
///
/// A handler receives the validated arguments and a per-call context and
/// must resolve to a [`ToolOutcome`]; an `Err` is a fault the normalizer
/// folds into envelope text.
pub type Handler = Arc<
    dyn Fn(Map<String, Value>, ToolContext) -> BoxFuture<'static, Result<ToolOutcome, ToolError>>
        + Send
        + Sync,
>;

/// Per-call context handed to a handler.
///
/// Built fresh for every dispatch and dropped when the call returns, so
/// external collaborators acquired through it (the Firecrawl client) are
/// never shared across concurrent calls.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
}

impl ToolContext {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Build a Firecrawl client for this call, or a business-level
    /// failure text when the key is not configured.
    pub fn firecrawl(&self) -> Result<FirecrawlClient, ToolOutcome> {
        match self.config.credentials.firecrawl_api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(FirecrawlClient::new(key)),
            _ => Err(ToolOutcome::failed(
                "Error: Firecrawl API key not configured (set MCP_FIRECRAWL_API_KEY)",
            )),
        }
    }
}

/// A named, schema-validated callable operation.
#[derive(Clone)]
pub struct ToolDefinition {
    name: &'static str,
    description: &'static str,
    schema: InputSchema,
    handler: Handler,
}

impl ToolDefinition {
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: InputSchema,
        handler: Handler,
    ) -> Self {
        Self {
            name,
            description,
            schema,
            handler,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn schema(&self) -> &InputSchema {
        &self.schema
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish()
    }
}

/// Deserialize validated arguments into a tool's typed parameter struct.
///
/// The validator has already checked types and applied defaults, so a
/// failure here is an internal schema/struct mismatch, not caller error.
pub fn parse_args<T: DeserializeOwned>(args: Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::internal(format!("argument decoding failed: {}", e)))
}

/// Tool registry - manages all available tool definitions.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, ToolDefinition>,
    order: Vec<&'static str>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool definition. Names are unique for the process
    /// lifetime; a second registration under the same name is rejected.
    pub fn register(&mut self, definition: ToolDefinition) -> Result<(), ToolError> {
        let name = definition.name();
        if self.tools.contains_key(name) {
            return Err(ToolError::duplicate(name));
        }
        self.order.push(name);
        self.tools.insert(name, definition);
        Ok(())
    }

    /// Look up a tool by exact, case-sensitive name.
    pub fn resolve(&self, name: &str) -> Result<&ToolDefinition, ToolError> {
        self.tools.get(name).ok_or_else(|| ToolError::not_found(name))
    }

    /// All definitions in registration order (used by `tools/list`).
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
