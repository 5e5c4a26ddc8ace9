//! Transport layer for the gateway.
//!
//! Two HTTP-family transports share one axum router:
//! - **Direct**: JSON-RPC over `POST /` and `POST /mcp`
//! - **Streaming**: SSE sessions over `GET /sse` + `POST /sse/message`
//!
//! Both sit behind the API-key middleware; every other target is a 404
//! with no authentication attempted.

mod config;
mod error;
pub mod http;
pub mod sse;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
