//! SSE streaming transport.
//!
//! `GET /sse` opens the streaming channel: the client receives an
//! `endpoint` event naming the message URL for its session, then tool
//! responses as `message` events, with keep-alive pings in between.
//! `POST /sse/message?sessionId=<id>` feeds JSON-RPC requests in; each
//! response is relayed over the open channel rather than the POST body.
//!
//! Sessions hold nothing but the event channel. When a client drops the
//! stream its entry is removed by the stream's drop guard; a relay racing
//! the disconnect hits the closed channel and removes it too. Any
//! in-flight handler is simply abandoned with its request task.

use std::collections::HashMap;
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    Json,
};
use futures::stream::Stream;
use serde::Deserialize;
use tokio::sync::{RwLock, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::http::{AppState, JsonRpcRequest, process_request};

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// SSE event sender for one session.
pub type EventSender = mpsc::Sender<Result<Event, Infallible>>;

/// Why a relay to a session failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSendError {
    /// No session with that id.
    NotFound,
    /// The client dropped the stream; the session has been removed.
    Disconnected,
}

/// Active SSE sessions, keyed by session id.
///
/// The only shared mutable state in the gateway; touched exclusively by
/// the streaming transport.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, EventSender>>>,
}

impl SessionStore {
    /// Register a new session's event channel.
    pub async fn register(&self, id: String, tx: EventSender) {
        self.inner.write().await.insert(id, tx);
    }

    /// Relay an event to a session, removing it on disconnect.
    pub async fn send(&self, id: &str, event: Event) -> Result<(), SessionSendError> {
        let tx = {
            let sessions = self.inner.read().await;
            sessions.get(id).cloned()
        };

        let Some(tx) = tx else {
            return Err(SessionSendError::NotFound);
        };

        if tx.send(Ok(event)).await.is_err() {
            self.remove(id).await;
            return Err(SessionSendError::Disconnected);
        }

        Ok(())
    }

    /// Drop a session.
    pub async fn remove(&self, id: &str) {
        self.inner.write().await.remove(id);
    }

    /// Number of active sessions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Deregisters a session when its event stream is dropped, so a client
/// that connects and silently disconnects cannot leave a dead sender in
/// the store.
struct SessionGuard {
    sessions: SessionStore,
    id: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let sessions = self.sessions.clone();
        let id = std::mem::take(&mut self.id);
        // Removal needs the async lock; outside a runtime there is no
        // store left worth cleaning.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                info!(session_id = %id, "SSE connection closed");
                sessions.remove(&id).await;
            });
        }
    }
}

/// The per-session event stream handed to axum, carrying the guard that
/// ties the session's lifetime to the connection's.
struct SessionStream {
    inner: ReceiverStream<Result<Event, Infallible>>,
    _guard: SessionGuard,
}

impl Stream for SessionStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}

/// Query parameters for the message endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageParams {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// Handle `GET /sse`: open the streaming channel for a new session.
pub(crate) async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4().to_string();
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    state.sessions.register(session_id.clone(), tx.clone()).await;

    // Tell the client where to POST its messages for this session
    let endpoint_event = Event::default()
        .event("endpoint")
        .data(format!("/sse/message?sessionId={}", session_id));

    if tx.send(Ok(endpoint_event)).await.is_err() {
        warn!("Failed to send initial endpoint event");
    }

    info!(session_id = %session_id, "SSE connection established");

    let stream = SessionStream {
        inner: ReceiverStream::new(rx),
        _guard: SessionGuard {
            sessions: state.sessions.clone(),
            id: session_id,
        },
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("ping"),
    )
}

/// Handle `POST /sse/message`: process one JSON-RPC request and relay
/// the response over the session's open channel.
pub(crate) async fn message_handler(
    State(state): State<AppState>,
    Query(params): Query<MessageParams>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    let response = process_request(&state, request).await;

    let payload = match serde_json::to_string(&response) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Failed to serialize SSE response: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };

    let event = Event::default().event("message").data(payload);

    match state.sessions.send(&params.session_id, event).await {
        Ok(()) => (StatusCode::ACCEPTED, "Accepted").into_response(),
        Err(reason) => {
            warn!(
                session_id = %params.session_id,
                "Dropping SSE message: {:?}", reason
            );
            (StatusCode::NOT_FOUND, "Unknown or disconnected session").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::server::McpServer;
    use crate::core::transport::http::build_router;
    use axum::body::Body;
    use http::Request as HttpRequest;
    use serde_json::json;
    use tower::util::ServiceExt;

    const KEY: &str = "secret123";

    fn test_state() -> AppState {
        let mut config = Config::default();
        config.credentials.api_key = Some(KEY.to_string());
        AppState::new(McpServer::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_store_send_to_registered_session() {
        let store = SessionStore::default();
        let (tx, mut rx) = mpsc::channel(4);
        store.register("abc".to_string(), tx).await;

        store.send("abc", Event::default().data("hi")).await.unwrap();
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_store_unknown_session() {
        let store = SessionStore::default();
        assert_eq!(
            store.send("ghost", Event::default()).await,
            Err(SessionSendError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_store_removes_disconnected_session() {
        let store = SessionStore::default();
        let (tx, rx) = mpsc::channel(4);
        store.register("abc".to_string(), tx).await;
        drop(rx);

        assert_eq!(
            store.send("abc", Event::default()).await,
            Err(SessionSendError::Disconnected)
        );
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_dropped_stream_removes_session() {
        // A client that connects and disconnects without ever POSTing
        // must not leave a dead sender in the store.
        let state = test_state();
        let stream = sse_handler(State(state.clone())).await;
        assert_eq!(state.sessions.len().await, 1);

        drop(stream);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(state.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_sse_endpoint_requires_auth() {
        let router = build_router(test_state(), false);
        let response = router
            .oneshot(
                HttpRequest::builder()
                    .uri("/sse")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_message_to_unknown_session_is_not_found() {
        let router = build_router(test_state(), false);
        let body = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"});
        let response = router
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri(format!("/sse/message?sessionId=ghost&api_key={}", KEY))
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_message_relayed_over_open_channel() {
        let state = test_state();
        let (tx, mut rx) = mpsc::channel(4);
        state.sessions.register("live".to_string(), tx).await;

        let router = build_router(state, false);
        let body = json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "add", "arguments": {"a": 2, "b": 3}}
        });
        let response = router
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri(format!("/sse/message?sessionId=live&api_key={}", KEY))
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(rx.recv().await.is_some());
    }
}
