//! Tool definitions module.
//!
//! Each tool is defined in its own file. `builtin_registry` is the single
//! place the process registers tools; registration happens once at server
//! construction and the registry is read-only afterwards.

pub mod add;
pub mod analyze_url;
pub mod calculate;
pub mod firecrawl;
pub mod scrape_webpage;

pub use add::AddTool;
pub use analyze_url::AnalyzeUrlTool;
pub use calculate::CalculateTool;
pub use firecrawl::{FindProductUrlTool, PriceExtractTool};
pub use scrape_webpage::ScrapeWebpageTool;

use super::error::ToolError;
use super::registry::ToolRegistry;

/// Build a registry holding all builtin tools.
///
/// A duplicate name here is a programming error and surfaces at startup,
/// before any request is served.
pub fn builtin_registry() -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register(AddTool::definition())?;
    registry.register(CalculateTool::definition())?;
    registry.register(ScrapeWebpageTool::definition())?;
    registry.register(AnalyzeUrlTool::definition())?;
    registry.register(PriceExtractTool::definition())?;
    registry.register(FindProductUrlTool::definition())?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_builds() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.len(), 6);
        for name in [
            "add",
            "calculate",
            "scrape_webpage",
            "analyze_url",
            "firecrawl_price_extract",
            "firecrawl_find_product_url",
        ] {
            assert!(registry.resolve(name).is_ok(), "missing builtin: {name}");
        }
    }
}
