//! Calculator tool with multiple operations.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;

use super::super::outcome::ToolOutcome;
use super::super::registry::{ToolDefinition, parse_args};
use super::super::schema::{FieldKind, InputSchema};

/// Supported arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

const OPERATIONS: &[&str] = &["add", "subtract", "multiply", "divide"];

/// Parameters for the calculate tool.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateParams {
    pub operation: Operation,
    pub a: f64,
    pub b: f64,
}

pub struct CalculateTool;

impl CalculateTool {
    pub const NAME: &'static str = "calculate";

    pub const DESCRIPTION: &'static str =
        "Perform an arithmetic operation (add, subtract, multiply, divide) on two numbers";

    pub fn schema() -> InputSchema {
        InputSchema::new()
            .required("operation", FieldKind::Enum(OPERATIONS))
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
                    let params: CalculateParams = parse_args(args)?;
                    Ok(Self::execute(&params))
                }
                .boxed()
            }),
        )
    }

    fn execute(params: &CalculateParams) -> ToolOutcome {
        let result = match params.operation {
            Operation::Add => params.a + params.b,
            Operation::Subtract => params.a - params.b,
            Operation::Multiply => params.a * params.b,
            Operation::Divide => {
                if params.b == 0.0 {
                    // Business-level failure, not a fault: the caller gets
                    // this text in a normal envelope.
                    return ToolOutcome::failed("Error: Cannot divide by zero");
                }
                params.a / params.b
            }
        };

        ToolOutcome::text(format!("{}", result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(operation: Operation, a: f64, b: f64) -> ToolOutcome {
        CalculateTool::execute(&CalculateParams { operation, a, b })
    }

    #[test]
    fn test_divide() {
        assert_eq!(calc(Operation::Divide, 10.0, 2.0), ToolOutcome::text("5"));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            calc(Operation::Divide, 10.0, 0.0),
            ToolOutcome::failed("Error: Cannot divide by zero")
        );
    }

    #[test]
    fn test_subtract() {
        assert_eq!(calc(Operation::Subtract, 2.0, 5.0), ToolOutcome::text("-3"));
    }

    #[test]
    fn test_multiply() {
        assert_eq!(calc(Operation::Multiply, 4.0, 2.5), ToolOutcome::text("10"));
    }

    #[test]
    fn test_operation_deserializes_lowercase() {
        let params: CalculateParams =
            serde_json::from_str(r#"{"operation": "divide", "a": 1, "b": 2}"#).unwrap();
        assert_eq!(params.operation, Operation::Divide);
    }

    #[test]
    fn test_schema_enum_matches_operations() {
        let rendered = CalculateTool::schema().to_json_schema();
        assert_eq!(
            rendered["properties"]["operation"]["enum"],
            serde_json::json!(OPERATIONS)
        );
    }
}
