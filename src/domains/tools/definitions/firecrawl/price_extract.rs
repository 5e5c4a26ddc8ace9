//! Firecrawl price extraction tool.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::domains::tools::outcome::ToolOutcome;
use crate::domains::tools::registry::{ToolContext, ToolDefinition, parse_args};
use crate::domains::tools::schema::{FieldKind, InputSchema};

/// Parameters for the price extraction tool.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceExtractParams {
    pub url: String,
    #[serde(default)]
    pub product_name: Option<String>,
}

pub struct PriceExtractTool;

impl PriceExtractTool {
    pub const NAME: &'static str = "firecrawl_price_extract";

    pub const DESCRIPTION: &'static str =
        "Extract the product price from a webpage using the Firecrawl extraction API";

    pub fn schema() -> InputSchema {
        InputSchema::new()
            .required("url", FieldKind::String)
            .optional("product_name", FieldKind::String)
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            Self::schema(),
            Arc::new(|args, ctx| {
                async move {
                    let params: PriceExtractParams = parse_args(args)?;
                    Ok(Self::execute(&params, &ctx).await)
                }
                .boxed()
            }),
        )
    }

    /// Build the extraction prompt, targeted at a named product when one
    /// was given.
    fn prompt(product_name: Option<&str>) -> String {
        match product_name {
            Some(name) => format!(
                "Extract the price for \"{}\" from this webpage. \
                 Return only the numerical price value (e.g., \"29.99\").",
                name
            ),
            None => "Extract the main product price from this webpage. \
                     Return only the numerical price value (e.g., \"29.99\")."
                .to_string(),
        }
    }

    async fn execute(params: &PriceExtractParams, ctx: &ToolContext) -> ToolOutcome {
        info!("Extracting price from {}", params.url);

        let client = match ctx.firecrawl() {
            Ok(client) => client,
            Err(outcome) => return outcome,
        };

        let prompt = Self::prompt(params.product_name.as_deref());
        let schema = json!({
            "type": "object",
            "properties": {
                "price": {
                    "type": "string",
                    "description": "The numerical price value"
                }
            },
            "required": ["price"]
        });

        match client.extract(&[&params.url], &prompt, schema).await {
            Ok(response) => {
                let price = response
                    .data
                    .as_ref()
                    .filter(|_| response.success)
                    .and_then(|data| data.get("price"))
                    .and_then(|price| price.as_str());

                match price {
                    Some(price) => ToolOutcome::text(price),
                    None => ToolOutcome::text("Price not found"),
                }
            }
            Err(e) => ToolOutcome::failed(format!("Error extracting price: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_with_product_name() {
        let prompt = PriceExtractTool::prompt(Some("Nintendo Switch"));
        assert!(prompt.contains("\"Nintendo Switch\""));
        assert!(prompt.contains("29.99"));
    }

    #[test]
    fn test_prompt_without_product_name() {
        let prompt = PriceExtractTool::prompt(None);
        assert!(prompt.starts_with("Extract the main product price"));
    }

    #[test]
    fn test_params_product_name_optional() {
        let params: PriceExtractParams =
            serde_json::from_str(r#"{"url": "https://example.com/item"}"#).unwrap();
        assert!(params.product_name.is_none());
    }
}
