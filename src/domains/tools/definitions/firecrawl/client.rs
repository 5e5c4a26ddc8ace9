//! Minimal Firecrawl REST client.
//!
//! Covers the two endpoints the tools need: prompt-driven extraction and
//! web search. One client instance serves exactly one tool call.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::domains::tools::error::ToolError;

const BASE_URL: &str = "https://api.firecrawl.dev/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response from the extract endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
}

/// One search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub url: Option<String>,
}

/// Response from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<SearchHit>>,
}

/// Per-call Firecrawl API client.
pub struct FirecrawlClient {
    api_key: String,
    base_url: String,
}

/// Custom Debug implementation to redact the key from logs.
impl std::fmt::Debug for FirecrawlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirecrawlClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FirecrawlClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    fn http(&self) -> Result<reqwest::Client, ToolError> {
        reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ToolError::internal(format!("HTTP client construction failed: {}", e)))
    }

    /// Run a prompt-driven extraction over the given URLs.
    pub async fn extract(
        &self,
        urls: &[&str],
        prompt: &str,
        schema: Value,
    ) -> Result<ExtractResponse, ToolError> {
        let body = json!({
            "urls": urls,
            "prompt": prompt,
            "schema": schema,
        });
        self.post("extract", body).await
    }

    /// Search the web, returning up to `limit` hits.
    pub async fn search(&self, query: &str, limit: usize) -> Result<SearchResponse, ToolError> {
        let body = json!({
            "query": query,
            "limit": limit,
        });
        self.post("search", body).await
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Value,
    ) -> Result<T, ToolError> {
        let response = self
            .http()?
            .post(format!("{}/{}", self.base_url, endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::execution_failed(format!(
                "Firecrawl API returned {}",
                status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ToolError::execution_failed(format!("malformed Firecrawl response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let client = FirecrawlClient::new("fc_super_secret");
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("fc_super_secret"));
    }

    #[test]
    fn test_extract_response_parses_price() {
        let parsed: ExtractResponse =
            serde_json::from_str(r#"{"success": true, "data": {"price": "29.99"}}"#).unwrap();
        assert!(parsed.success);
        assert_eq!(
            parsed.data.unwrap().get("price").and_then(|v| v.as_str()),
            Some("29.99")
        );
    }

    #[test]
    fn test_search_response_tolerates_missing_fields() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!parsed.success);
        assert!(parsed.data.is_none());

        let parsed: SearchResponse =
            serde_json::from_str(r#"{"success": true, "data": [{"title": "no url here"}]}"#)
                .unwrap();
        assert!(parsed.data.unwrap()[0].url.is_none());
    }
}
