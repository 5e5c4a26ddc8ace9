//! Simple addition tool.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;

use super::super::registry::{ToolDefinition, parse_args};
use super::super::schema::{FieldKind, InputSchema};
use super::super::outcome::ToolOutcome;

/// Parameters for the add tool.
#[derive(Debug, Clone, Deserialize)]
pub struct AddParams {
    pub a: f64,
    pub b: f64,
}

pub struct AddTool;

impl AddTool {
    /// Tool name as exposed to clients.
    pub const NAME: &'static str = "add";

    pub const DESCRIPTION: &'static str = "Add two numbers";

    pub fn schema() -> InputSchema {
        InputSchema::new()
            .required("a", FieldKind::Number)
            .required("b", FieldKind::Number)
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            Self::schema(),
            Arc::new(|args, _ctx| {
                async move {
                    let params: AddParams = parse_args(args)?;
                    Ok(Self::execute(&params))
                }
                .boxed()
            }),
        )
    }

    fn execute(params: &AddParams) -> ToolOutcome {
        ToolOutcome::text(format!("{}", params.a + params.b))
    }
}
