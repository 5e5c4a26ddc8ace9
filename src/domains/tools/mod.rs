//! Tools domain module.
//!
//! Everything between an inbound tool call and its response envelope
//! lives here:
//!
//! - `schema.rs` - input schemas and the argument validator
//! - `registry.rs` - tool definitions and the read-only registry
//! - `dispatcher.rs` - resolve, validate, invoke, normalize
//! - `outcome.rs` - outcomes, the envelope shape, and the normalizer
//! - `definitions/` - the individual tools (one file per tool)
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with a params struct, a
//!    `schema()`, an `execute()`, and a `definition()` constructor
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in `definitions::builtin_registry()`

pub mod definitions;
pub mod dispatcher;
mod error;
pub mod outcome;
pub mod registry;
pub mod schema;

pub use dispatcher::{Dispatcher, ToolCallRequest};
pub use error::ToolError;
pub use outcome::{ContentItem, ResponseEnvelope, ToolOutcome};
pub use registry::{ToolContext, ToolDefinition, ToolRegistry};
pub use schema::{FieldKind, InputSchema, ValidationError};
