//! Tool Dispatcher - resolves, validates, invokes, and normalizes.
//!
//! Every inbound tool call goes through one `dispatch` and terminates in
//! exactly one [`ResponseEnvelope`]. Unknown tools, bad arguments, handler
//! faults, and even handler panics all fold into envelope text; nothing
//! escapes to the transport.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value};
use tracing::{instrument, warn};

use crate::core::config::Config;

use super::outcome::{ResponseEnvelope, ToolOutcome, normalize};
use super::registry::{ToolContext, ToolRegistry};
use super::schema::validate;

/// One inbound tool call. Created per call, consumed synchronously.
#[derive(Debug, Clone)]
pub struct ToolCallRequest {
    /// Name of the tool to invoke.
    pub tool_name: String,
    /// Raw argument mapping as supplied by the caller.
    pub arguments: Map<String, Value>,
}

/// The tool dispatcher.
///
/// Stateless across calls: the registry and configuration it holds are
/// read-only, and each call gets a fresh [`ToolContext`]. Handlers cannot
/// observe state left behind by a prior call.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    config: Arc<Config>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, config: Arc<Config>) -> Self {
        Self { registry, config }
    }

    /// Dispatch one tool call.
    ///
    /// 1. Resolve the tool by name; an unknown name is reported in the
    ///    envelope, never as a transport-level error.
    /// 2. Validate arguments; on failure the handler is never invoked.
    /// 3. Invoke the handler with a per-call context; the context (and
    ///    any external client built from it) is dropped when the call
    ///    returns. A panicking handler is caught and treated as a fault.
    /// 4. Normalize the outcome.
    #[instrument(skip(self, request), fields(tool = %request.tool_name))]
    pub async fn dispatch(&self, request: ToolCallRequest) -> ResponseEnvelope {
        let definition = match self.registry.resolve(&request.tool_name) {
            Ok(definition) => definition,
            Err(fault) => {
                warn!("Unknown tool requested: {}", request.tool_name);
                return normalize(&request.tool_name, Err(fault));
            }
        };

        let validated = match validate(definition.schema(), &request.arguments) {
            Ok(validated) => validated,
            Err(error) => {
                warn!("Argument validation failed for {}: {}", request.tool_name, error);
                return normalize(&request.tool_name, Err(error.into()));
            }
        };

        let context = ToolContext::new(self.config.clone());
        let invocation = (definition.handler())(validated, context);

        let result = match AssertUnwindSafe(invocation).catch_unwind().await {
            Ok(result) => result,
            Err(_) => {
                warn!("Handler panicked in tool {}", request.tool_name);
                Err(super::error::ToolError::internal("tool handler panicked"))
            }
        };

        normalize(&request.tool_name, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::error::ToolError;
    use crate::domains::tools::registry::ToolDefinition;
    use crate::domains::tools::schema::{FieldKind, InputSchema};
    use serde_json::json;

    fn test_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDefinition::new(
                "echo",
                "echoes its message argument",
                InputSchema::new().required("message", FieldKind::String),
                Arc::new(|args, _ctx| {
                    async move {
                        let message = args["message"].as_str().unwrap_or_default().to_string();
                        Ok(ToolOutcome::text(message))
                    }
                    .boxed()
                }),
            ))
            .unwrap();
        registry
            .register(ToolDefinition::new(
                "always_fails",
                "returns a business-level failure",
                InputSchema::new(),
                Arc::new(|_args, _ctx| {
                    async { Ok(ToolOutcome::failed("Error: upstream unavailable")) }.boxed()
                }),
            ))
            .unwrap();
        registry
            .register(ToolDefinition::new(
                "raises",
                "returns a fault",
                InputSchema::new(),
                Arc::new(|_args, _ctx| {
                    async { Err(ToolError::execution_failed("boom")) }.boxed()
                }),
            ))
            .unwrap();
        registry
            .register(ToolDefinition::new(
                "panics",
                "panics mid-handler",
                InputSchema::new(),
                Arc::new(|_args, _ctx| async { panic!("deliberate test panic") }.boxed()),
            ))
            .unwrap();
        registry
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(test_registry()), Arc::new(Config::default()))
    }

    fn request(name: &str, args: serde_json::Value) -> ToolCallRequest {
        ToolCallRequest {
            tool_name: name.to_string(),
            arguments: args.as_object().cloned().unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn test_successful_dispatch() {
        let envelope = dispatcher()
            .dispatch(request("echo", json!({"message": "hello"})))
            .await;
        assert_eq!(envelope.content[0].text, "hello");
    }

    #[tokio::test]
    async fn test_unknown_tool_reported_in_envelope() {
        let envelope = dispatcher().dispatch(request("nope", json!({}))).await;
        assert_eq!(envelope.content.len(), 1);
        assert!(envelope.content[0].text.contains("Tool not found: nope"));
    }

    #[tokio::test]
    async fn test_validation_failure_reported_in_envelope() {
        let envelope = dispatcher()
            .dispatch(request("echo", json!({"message": 42})))
            .await;
        assert!(envelope.content[0].text.contains("Invalid arguments"));
        assert!(envelope.content[0].text.contains("message"));
    }

    #[tokio::test]
    async fn test_business_failure_kept_verbatim() {
        let envelope = dispatcher().dispatch(request("always_fails", json!({}))).await;
        assert_eq!(envelope.content[0].text, "Error: upstream unavailable");
    }

    #[tokio::test]
    async fn test_fault_folded_into_text() {
        let envelope = dispatcher().dispatch(request("raises", json!({}))).await;
        assert_eq!(
            envelope.content[0].text,
            "Error calling raises: Execution failed: boom"
        );
    }

    #[tokio::test]
    async fn test_panicking_handler_yields_envelope() {
        let envelope = dispatcher().dispatch(request("panics", json!({}))).await;
        assert!(envelope.content[0].text.contains("tool handler panicked"));
    }

    // Simple xorshift so the randomized property test is deterministic
    // without pulling in a RNG dependency.
    struct XorShift(u64);

    impl XorShift {
        fn next(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }
    }

    #[tokio::test]
    async fn test_thousand_randomized_calls_all_yield_envelopes() {
        let dispatcher = dispatcher();
        let mut rng = XorShift(0x5eed_cafe_f00d_1234);

        let names = ["echo", "always_fails", "raises", "panics", "ghost", ""];
        let argument_pool = [
            json!({}),
            json!({"message": "ok"}),
            json!({"message": 7}),
            json!({"message": null}),
            json!({"message": {"nested": true}}),
            json!({"unrelated": [1, 2, 3]}),
        ];

        for _ in 0..1000 {
            let name = names[(rng.next() % names.len() as u64) as usize];
            let args = argument_pool[(rng.next() % argument_pool.len() as u64) as usize].clone();
            let envelope = dispatcher.dispatch(request(name, args)).await;
            assert!(!envelope.content.is_empty());
        }
    }
}
