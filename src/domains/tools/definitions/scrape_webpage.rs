//! Web scraping tool.
//!
//! Fetches a page with a configurable user agent and reports either the
//! raw HTML or a plain-text rendition (scripts, styles, and tags stripped,
//! whitespace collapsed). All network and HTTP failures are converted to
//! failure text inside the handler; nothing here raises past its boundary.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use futures::FutureExt;
use regex::Regex;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::super::outcome::ToolOutcome;
use super::super::registry::{ToolDefinition, parse_args};
use super::super::schema::{FieldKind, InputSchema};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; MCP-Scraper/1.0)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Parameters for the scrape tool.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeParams {
    pub url: String,

    /// Accepted for caller compatibility; currently unused.
    #[serde(default)]
    pub selector: Option<String>,

    #[serde(default = "default_extract_text")]
    pub extract_text: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_extract_text() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

pub struct ScrapeWebpageTool;

impl ScrapeWebpageTool {
    pub const NAME: &'static str = "scrape_webpage";

    pub const DESCRIPTION: &'static str =
        "Fetch a webpage and return its content as plain text (default) or raw HTML";

    pub fn schema() -> InputSchema {
        InputSchema::new()
            .required("url", FieldKind::String)
            .optional("selector", FieldKind::String)
            .optional_with_default("extract_text", FieldKind::Boolean, json!(true))
            .optional_with_default("user_agent", FieldKind::String, json!(DEFAULT_USER_AGENT))
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            Self::schema(),
            Arc::new(|args, _ctx| {
                async move {
                    let params: ScrapeParams = parse_args(args)?;
                    Ok(Self::execute(&params).await)
                }
                .boxed()
            }),
        )
    }

    async fn execute(params: &ScrapeParams) -> ToolOutcome {
        info!("Scraping {}", params.url);

        let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => return scrape_error(&params.url, &e),
        };

        let response = match client
            .get(&params.url)
            .header(USER_AGENT, &params.user_agent)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return scrape_error(&params.url, &e),
        };

        let status = response.status();
        if !status.is_success() {
            return ToolOutcome::failed(format!(
                "HTTP Error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            ));
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => return scrape_error(&params.url, &e),
        };

        if params.extract_text {
            ToolOutcome::text(text_report(&params.url, &strip_html(&html)))
        } else {
            ToolOutcome::text(html_report(&params.url, &html))
        }
    }
}

fn text_report(url: &str, text: &str) -> String {
    format!(
        "URL: {}\nLength: {} characters\n\nContent:\n{}",
        url,
        text.chars().count(),
        text
    )
}

fn html_report(url: &str, html: &str) -> String {
    format!(
        "URL: {}\nHTML Length: {} characters\n\nHTML:\n{}",
        url,
        html.chars().count(),
        html
    )
}

fn scrape_error(url: &str, error: &dyn std::fmt::Display) -> ToolOutcome {
    ToolOutcome::failed(format!("Error scraping {}: {}", url, error))
}

/// Simple HTML to text conversion: drop script and style blocks, strip
/// the remaining tags, collapse whitespace.
fn strip_html(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, "");
    let without_styles = STYLE_RE.replace_all(&without_scripts, "");
    let without_tags = TAG_RE.replace_all(&without_styles, " ");
    WHITESPACE_RE.replace_all(&without_tags, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_removes_scripts_and_styles() {
        let html = r#"<html><head><style>body { color: red; }</style>
            <script type="text/javascript">alert("hi");</script></head>
            <body><p>Hello <b>world</b></p></body></html>"#;
        assert_eq!(strip_html(html), "Hello world");
    }

    #[test]
    fn test_strip_html_case_insensitive_blocks() {
        let html = "<SCRIPT>var x = 1;</SCRIPT><p>kept</p>";
        assert_eq!(strip_html(html), "kept");
    }

    #[test]
    fn test_strip_html_collapses_whitespace() {
        let html = "<div>one</div>\n\n   <div>two\tthree</div>";
        assert_eq!(strip_html(html), "one two three");
    }

    #[test]
    fn test_reports_count_characters_not_bytes() {
        // "héllo wörld" is 11 characters but 13 bytes in UTF-8
        let report = text_report("https://example.com", "héllo wörld");
        assert!(report.contains("Length: 11 characters"));

        let report = html_report("https://example.com", "<p>héllo</p>");
        assert!(report.contains("HTML Length: 12 characters"));
    }

    #[test]
    fn test_params_defaults() {
        let params: ScrapeParams =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert!(params.extract_text);
        assert_eq!(params.user_agent, DEFAULT_USER_AGENT);
        assert!(params.selector.is_none());
    }
}
