//! HTTP transport implementation.
//!
//! One axum router serves both channels: JSON-RPC over POST for the
//! direct endpoints (`/` and `/mcp`) and the SSE streaming family
//! (`GET /sse`, `POST /sse/message`). All four targets sit behind the
//! API-key middleware; anything else falls through to a 404 without an
//! authentication attempt.

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use super::sse::{SessionStore, message_handler, sse_handler};
use super::{HttpConfig, TransportError, TransportResult};
use crate::core::auth::ApiKeyGate;
use crate::core::error::Error;
use crate::core::server::McpServer;

const AUTH_CHALLENGE: &str = "Bearer realm=\"MCP Server\"";
const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The gateway server handle.
    pub(crate) server: McpServer,
    /// The authentication gate for protected targets.
    pub(crate) gate: ApiKeyGate,
    /// Active SSE sessions.
    pub(crate) sessions: SessionStore,
}

impl AppState {
    pub fn new(server: McpServer) -> Self {
        let gate = ApiKeyGate::new(server.config().credentials.api_key.clone());
        Self {
            server,
            gate,
            sessions: SessionStore::default(),
        }
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.config.address();
        let state = AppState::new(server);
        let app = build_router(state, self.config.enable_cors);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (API-key gated)", addr);
        info!("  → Direct JSON-RPC: POST / and POST /mcp");
        info!("  → Streaming:       GET /sse, POST /sse/message");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the transport router.
///
/// Protected targets are wrapped by the API-key middleware; the fallback
/// is registered outside it so unmatched targets 404 without touching
/// the gate.
pub(crate) fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/", post(handle_rpc))
        .route("/mcp", post(handle_rpc))
        .route("/sse", get(sse_handler))
        .route("/sse/message", post(message_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Fallback for unmatched targets. No authentication is attempted.
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

/// API-key middleware for the protected targets.
///
/// A missing or wrong credential gets a 401 with a bearer challenge; a
/// gate configuration error gets a 500 with a body naming the
/// misconfiguration, so operators can tell the two apart.
async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match state
        .gate
        .authenticate(request.headers(), request.uri().query())
    {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            warn!("Rejected request to {} with invalid or missing API key", request.uri().path());
            (
                StatusCode::UNAUTHORIZED,
                [
                    (header::WWW_AUTHENTICATE, AUTH_CHALLENGE),
                    (header::CONTENT_TYPE, "text/plain"),
                ],
                "Unauthorized: Invalid or missing API key",
            )
                .into_response()
        }
        Err(Error::Config(msg)) => {
            error!("Authentication gate misconfigured: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server misconfigured: API key is not set",
            )
                .into_response()
        }
        Err(e) => {
            error!("Authentication gate failure: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Handle JSON-RPC requests on the direct channel.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state, request).await;

    (StatusCode::OK, Json(response))
}

/// Process a JSON-RPC request and return the response.
///
/// Shared by the direct channel and the SSE message endpoint.
pub(crate) async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(state, request),

        "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),

        "tools/list" => handle_tools_list(state, request),

        "tools/call" => handle_tools_call(state, request).await,

        // Notifications need no response on a stateless channel
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", request.method);
            JsonRpcResponse::success(request.id, serde_json::json!(null))
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Handle initialize request.
fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let result = serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        }
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let tools = state.server.list_tools();
    JsonRpcResponse::success(request.id, serde_json::json!({ "tools": tools }))
}

/// Handle tools/call request.
async fn handle_tools_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing tool name"),
    };

    let arguments = match params.get("arguments") {
        None => serde_json::Map::new(),
        Some(value) => match value.as_object() {
            Some(map) => map.clone(),
            None => {
                return JsonRpcResponse::invalid_params(request.id, "Arguments must be an object");
            }
        },
    };

    let envelope = state.server.call_tool(&name, arguments).await;

    match serde_json::to_value(&envelope) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}
