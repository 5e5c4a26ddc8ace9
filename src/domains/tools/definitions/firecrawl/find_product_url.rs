//! Firecrawl product URL search tool.
//!
//! Runs a site-scoped web search against a fixed set of retailers and
//! returns the first hit's URL.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::outcome::ToolOutcome;
use crate::domains::tools::registry::{ToolContext, ToolDefinition, parse_args};
use crate::domains::tools::schema::{FieldKind, InputSchema};

const SEARCH_LIMIT: usize = 3;

/// Retailers the search can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retailer {
    Walmart,
    Bestbuy,
    Target,
    Amazon,
}

const RETAILERS: &[&str] = &["walmart", "bestbuy", "target", "amazon"];

impl Retailer {
    fn domain(self) -> &'static str {
        match self {
            Self::Walmart => "walmart.com",
            Self::Bestbuy => "bestbuy.com",
            Self::Target => "target.com",
            Self::Amazon => "amazon.com",
        }
    }
}

/// Parameters for the product URL search tool.
#[derive(Debug, Clone, Deserialize)]
pub struct FindProductUrlParams {
    pub product_name: String,
    pub retailer: Retailer,
}

pub struct FindProductUrlTool;

impl FindProductUrlTool {
    pub const NAME: &'static str = "firecrawl_find_product_url";

    pub const DESCRIPTION: &'static str =
        "Find a product page URL at a retailer (walmart, bestbuy, target, amazon) via Firecrawl search";

    pub fn schema() -> InputSchema {
        InputSchema::new()
            .required("product_name", FieldKind::String)
            .required("retailer", FieldKind::Enum(RETAILERS))
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            Self::schema(),
            Arc::new(|args, ctx| {
                async move {
                    let params: FindProductUrlParams = parse_args(args)?;
                    Ok(Self::execute(&params, &ctx).await)
                }
                .boxed()
            }),
        )
    }

    fn search_query(params: &FindProductUrlParams) -> String {
        format!("site:{} {}", params.retailer.domain(), params.product_name)
    }

    async fn execute(params: &FindProductUrlParams, ctx: &ToolContext) -> ToolOutcome {
        let query = Self::search_query(params);
        info!("Searching for product URL: {}", query);

        let client = match ctx.firecrawl() {
            Ok(client) => client,
            Err(outcome) => return outcome,
        };

        match client.search(&query, SEARCH_LIMIT).await {
            Ok(response) => {
                let hits = response.data.filter(|_| response.success).unwrap_or_default();
                match hits.first() {
                    Some(hit) => match hit.url.as_deref() {
                        Some(url) => ToolOutcome::text(url),
                        None => ToolOutcome::text("URL not available"),
                    },
                    None => ToolOutcome::text("URL not found"),
                }
            }
            Err(e) => ToolOutcome::failed(format!("Error finding URL: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(retailer: Retailer) -> FindProductUrlParams {
        FindProductUrlParams {
            product_name: "wireless headphones".to_string(),
            retailer,
        }
    }

    #[test]
    fn test_search_query_is_site_scoped() {
        assert_eq!(
            FindProductUrlTool::search_query(&params(Retailer::Walmart)),
            "site:walmart.com wireless headphones"
        );
        assert_eq!(
            FindProductUrlTool::search_query(&params(Retailer::Bestbuy)),
            "site:bestbuy.com wireless headphones"
        );
    }

    #[test]
    fn test_retailer_deserializes_lowercase() {
        let params: FindProductUrlParams =
            serde_json::from_str(r#"{"product_name": "tv", "retailer": "target"}"#).unwrap();
        assert_eq!(params.retailer, Retailer::Target);
    }

    #[test]
    fn test_unknown_retailer_rejected_by_params() {
        let result: Result<FindProductUrlParams, _> =
            serde_json::from_str(r#"{"product_name": "tv", "retailer": "ebay"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_enum_matches_retailers() {
        let rendered = FindProductUrlTool::schema().to_json_schema();
        assert_eq!(
            rendered["properties"]["retailer"]["enum"],
            serde_json::json!(RETAILERS)
        );
    }
}
