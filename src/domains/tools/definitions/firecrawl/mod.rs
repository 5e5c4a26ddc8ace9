//! Firecrawl-backed tools.
//!
//! These tools call the Firecrawl REST API for structured extraction and
//! web search. The client is built per call from the configured key (see
//! `ToolContext::firecrawl`) and dropped when the call returns.

pub mod client;
pub mod find_product_url;
pub mod price_extract;

pub use client::FirecrawlClient;
pub use find_product_url::FindProductUrlTool;
pub use price_extract::PriceExtractTool;
