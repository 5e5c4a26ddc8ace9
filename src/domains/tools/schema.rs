//! Input schemas and the argument validator.
//!
//! Every tool declares the fields it accepts as an [`InputSchema`]. The
//! validator checks inbound arguments against that declaration before the
//! handler runs: type checks, required fields, enum membership, and
//! defaults for optional absent fields. Unknown extra fields are ignored
//! so forward-compatible callers keep working.
//!
//! Validation is total and side-effect-free: it never invokes a handler,
//! never performs I/O, and never panics.

use serde_json::{Map, Value, json};
use thiserror::Error;

/// A validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}': {reason}")]
pub struct ValidationError {
    /// The name of the offending field.
    pub field: String,
    /// Why the value was rejected.
    pub reason: String,
}

impl ValidationError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// The accepted type of a schema field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Any JSON number.
    Number,
    /// A JSON string.
    String,
    /// A JSON boolean.
    Boolean,
    /// A string restricted to a fixed set of values.
    Enum(&'static [&'static str]),
    /// A nested JSON object (contents are the handler's concern).
    Object,
}

impl FieldKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Number => value.is_number(),
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Enum(allowed) => value
                .as_str()
                .is_some_and(|s| allowed.contains(&s)),
            Self::Object => value.is_object(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Number => "a number".to_string(),
            Self::String => "a string".to_string(),
            Self::Boolean => "a boolean".to_string(),
            Self::Enum(allowed) => format!("one of [{}]", allowed.join(", ")),
            Self::Object => "an object".to_string(),
        }
    }

    fn json_type(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String | Self::Enum(_) => "string",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }
}

/// One declared field of a tool's input.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    required: bool,
    default: Option<Value>,
}

/// Structural description of the fields a tool accepts.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required field.
    pub fn required(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: true,
            default: None,
        });
        self
    }

    /// Declare an optional field with no default; absent values are
    /// simply left out of the validated arguments.
    pub fn optional(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: false,
            default: None,
        });
        self
    }

    /// Declare an optional field with a default applied when absent.
    pub fn optional_with_default(
        mut self,
        name: &'static str,
        kind: FieldKind,
        default: Value,
    ) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: false,
            default: Some(default),
        });
        self
    }

    /// Render this schema as a JSON Schema object for `tools/list`.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut prop = Map::new();
            prop.insert("type".to_string(), json!(field.kind.json_type()));
            if let FieldKind::Enum(allowed) = field.kind {
                prop.insert("enum".to_string(), json!(allowed));
            }
            if let Some(default) = &field.default {
                prop.insert("default".to_string(), default.clone());
            }
            properties.insert(field.name.to_string(), Value::Object(prop));

            if field.required {
                required.push(field.name);
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Check raw arguments against a schema, producing the validated
/// argument map the handler will receive.
///
/// Declared fields are type-checked and copied over; optional absent
/// fields get their declared default; unknown extra fields are dropped
/// without error.
pub fn validate(
    schema: &InputSchema,
    raw: &Map<String, Value>,
) -> Result<Map<String, Value>, ValidationError> {
    let mut validated = Map::new();

    for field in &schema.fields {
        match raw.get(field.name) {
            Some(value) => {
                if !field.kind.matches(value) {
                    return Err(ValidationError::new(
                        field.name,
                        format!("expected {}", field.kind.describe()),
                    ));
                }
                validated.insert(field.name.to_string(), value.clone());
            }
            None if field.required => {
                return Err(ValidationError::new(field.name, "missing required field"));
            }
            None => {
                if let Some(default) = &field.default {
                    validated.insert(field.name.to_string(), default.clone());
                }
            }
        }
    }

    Ok(validated)
}
