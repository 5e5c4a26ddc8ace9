//! Tool outcomes and the response normalizer.
//!
//! Internally a handler result is a proper tagged variant so logic stays
//! exhaustive and testable. Externally every outcome, success or failure,
//! is folded into one envelope shape: an ordered sequence of text content
//! items. Callers never see a distinct error shape for a failed tool call.

use serde::{Deserialize, Serialize};

use super::error::ToolError;

/// A single content item in a response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Content discriminator; always `"text"` for this gateway.
    #[serde(rename = "type")]
    pub kind: String,

    /// The text payload.
    pub text: String,
}

impl ContentItem {
    /// Create a text content item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// What a tool handler produced.
///
/// Handlers convert their own internal faults (network errors, malformed
/// upstream responses) to `Failed` with a pre-formatted message before
/// returning; a raised `ToolError` or panic is the exception path handled
/// at the normalizer boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The call succeeded with the given content items.
    Success(Vec<ContentItem>),
    /// The call failed at the business level; the message is shown to the
    /// caller verbatim as envelope text.
    Failed(String),
}

impl ToolOutcome {
    /// A successful outcome with a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Success(vec![ContentItem::text(text)])
    }

    /// A failed outcome.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// The uniform response shape returned for every tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Ordered content items.
    pub content: Vec<ContentItem>,
}

impl ResponseEnvelope {
    /// An envelope carrying a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(text)],
        }
    }
}

/// Fold a handler result into the uniform envelope.
///
/// `context` names the operation for fault messages, e.g. the tool name.
/// This function never fails and never panics; it is the last line of
/// defense keeping one bad tool call from crashing the serving loop.
pub fn normalize(context: &str, result: Result<ToolOutcome, ToolError>) -> ResponseEnvelope {
    match result {
        Ok(ToolOutcome::Success(content)) => ResponseEnvelope { content },
        Ok(ToolOutcome::Failed(message)) => ResponseEnvelope::text(message),
        Err(fault) => ResponseEnvelope::text(format!("Error calling {}: {}", context, fault)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_content_through() {
        let items = vec![ContentItem::text("first"), ContentItem::text("second")];
        let envelope = normalize("add", Ok(ToolOutcome::Success(items.clone())));
        assert_eq!(envelope.content, items);
    }

    #[test]
    fn test_failed_message_kept_verbatim() {
        let envelope = normalize(
            "calculate",
            Ok(ToolOutcome::failed("Error: Cannot divide by zero")),
        );
        assert_eq!(envelope.content.len(), 1);
        assert_eq!(envelope.content[0].text, "Error: Cannot divide by zero");
    }

    #[test]
    fn test_fault_folded_into_context_message() {
        let envelope = normalize(
            "scrape_webpage",
            Err(ToolError::execution_failed("connection refused")),
        );
        assert_eq!(
            envelope.content[0].text,
            "Error calling scrape_webpage: Execution failed: connection refused"
        );
    }

    #[test]
    fn test_envelope_serializes_to_mcp_shape() {
        let envelope = ResponseEnvelope::text("5");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"content": [{"type": "text", "text": "5"}]})
        );
    }
}
