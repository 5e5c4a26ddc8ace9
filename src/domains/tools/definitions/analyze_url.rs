//! URL analysis tool.
//!
//! Issues a HEAD request and reports the status line and a handful of
//! response headers, with "unknown" standing in for anything the server
//! did not send.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::info;

use super::super::outcome::ToolOutcome;
use super::super::registry::{ToolDefinition, parse_args};
use super::super::schema::{FieldKind, InputSchema};

const ANALYZER_USER_AGENT: &str = "Mozilla/5.0 (compatible; MCP-Analyzer/1.0)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const REPORTED_HEADERS: &[(&str, &str)] = &[
    ("Content-Type", "content-type"),
    ("Content-Length", "content-length"),
    ("Server", "server"),
    ("Last-Modified", "last-modified"),
];

/// Parameters for the analyze tool.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeUrlParams {
    pub url: String,
}

pub struct AnalyzeUrlTool;

impl AnalyzeUrlTool {
    pub const NAME: &'static str = "analyze_url";

    pub const DESCRIPTION: &'static str =
        "Issue a HEAD request to a URL and report its status and key response headers";

    pub fn schema() -> InputSchema {
        InputSchema::new().required("url", FieldKind::String)
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            Self::schema(),
            Arc::new(|args, _ctx| {
                async move {
                    let params: AnalyzeUrlParams = parse_args(args)?;
                    Ok(Self::execute(&params).await)
                }
                .boxed()
            }),
        )
    }

    async fn execute(params: &AnalyzeUrlParams) -> ToolOutcome {
        info!("Analyzing {}", params.url);

        let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => return analyze_error(&params.url, &e),
        };

        let response = match client
            .head(&params.url)
            .header(USER_AGENT, ANALYZER_USER_AGENT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return analyze_error(&params.url, &e),
        };

        let status = response.status();
        let mut report = format!(
            "URL Analysis: {}\nStatus: {} {}",
            params.url,
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );

        for (label, header) in REPORTED_HEADERS {
            let value = response
                .headers()
                .get(*header)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            report.push_str(&format!("\n{}: {}", label, value));
        }

        ToolOutcome::text(report)
    }
}

fn analyze_error(url: &str, error: &dyn std::fmt::Display) -> ToolOutcome {
    ToolOutcome::failed(format!("Error analyzing {}: {}", url, error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_require_url() {
        let result: Result<AnalyzeUrlParams, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_requires_url() {
        let rendered = AnalyzeUrlTool::schema().to_json_schema();
        assert_eq!(rendered["required"], serde_json::json!(["url"]));
    }

    #[test]
    fn test_analyze_error_text() {
        let outcome = analyze_error("https://example.com", &"timed out");
        assert_eq!(
            outcome,
            ToolOutcome::failed("Error analyzing https://example.com: timed out")
        );
    }
}
