//! Declared tool arguments and their validation.
//!
//! Each tool declares an ordered list of [`ArgumentSpec`]s. Incoming
//! argument bags are checked against it before a handler ever sees them:
//! unknown keys are rejected, required keys must be present, and values are
//! coerced to their declared kind. The result is a normalized JSON object
//! that deserializes cleanly into the tool's parameter struct.

use rmcp::model::JsonObject;
use serde_json::{Number, Value};

use super::error::ToolError;

/// Kind of value an argument accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// Any JSON string, passed through untouched.
    String,
    /// An integer >= 1. Accepts JSON integers, integral floats and numeric strings.
    PositiveInteger,
}

impl ArgumentKind {
    fn expected(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::PositiveInteger => "positive integer",
        }
    }
}

/// One declared argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    pub name: &'static str,
    pub kind: ArgumentKind,
    pub required: bool,
    pub default: Option<Value>,
}

impl ArgumentSpec {
    pub fn required_string(name: &'static str) -> Self {
        Self {
            name,
            kind: ArgumentKind::String,
            required: true,
            default: None,
        }
    }

    pub fn optional_integer(name: &'static str, default: u32) -> Self {
        Self {
            name,
            kind: ArgumentKind::PositiveInteger,
            required: false,
            default: Some(Value::from(default)),
        }
    }

    fn coerce(&self, value: &Value) -> Result<Value, ToolError> {
        let invalid = || ToolError::invalid_type(self.name, self.kind.expected(), value.to_string());
        match self.kind {
            ArgumentKind::String => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(invalid()),
            },
            ArgumentKind::PositiveInteger => {
                let n = coerce_integer(value).ok_or_else(invalid)?;
                if n < 1 || n > u32::MAX as i64 {
                    return Err(invalid());
                }
                Ok(Value::Number(Number::from(n)))
            }
        }
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Validate `arguments` for `tool` against `specs`.
///
/// Returns a new object holding every declared argument, with defaults
/// filled in for absent optional ones.
pub fn validate_arguments(
    tool: &str,
    specs: &[ArgumentSpec],
    arguments: Option<&JsonObject>,
) -> Result<JsonObject, ToolError> {
    let empty = JsonObject::new();
    let arguments = arguments.unwrap_or(&empty);

    let required: Vec<&str> = specs.iter().filter(|s| s.required).map(|s| s.name).collect();
    if arguments.is_empty() && !required.is_empty() {
        return Err(ToolError::missing_arguments(format!(
            "'{}' requires arguments: {}",
            tool,
            required.join(", ")
        )));
    }

    if let Some(unknown) = arguments
        .keys()
        .find(|key| !specs.iter().any(|s| s.name == key.as_str()))
    {
        return Err(ToolError::UnknownArgument {
            tool: tool.to_string(),
            argument: unknown.clone(),
        });
    }

    let mut normalized = JsonObject::new();
    for spec in specs {
        match arguments.get(spec.name) {
            // An explicit null is treated like an absent key.
            Some(Value::Null) | None => {
                if spec.required {
                    return Err(ToolError::missing_arguments(format!(
                        "'{}' requires argument '{}'",
                        tool, spec.name
                    )));
                }
                if let Some(default) = &spec.default {
                    normalized.insert(spec.name.to_string(), default.clone());
                }
            }
            Some(value) => {
                normalized.insert(spec.name.to_string(), spec.coerce(value)?);
            }
        }
    }

    Ok(normalized)
}
