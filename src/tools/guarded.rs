//! Guarded Tool Inputs
//!
//! Every sensitive, register-eligible parameter (addresses, amounts,
//! calldata) is declared as a strict two-armed choice: read it from the
//! register store, or supply a fully literal value. Never a silent mix
//! of both. Validation runs at the input boundary, before the tool body
//! executes and before any side effect.

use serde_json::{json, Value};

use crate::error::{InputError, RegisterError};
use crate::registers::RegisterStore;

/// A validated sensitive parameter: a register reference or a literal.
#[derive(Clone, Debug, PartialEq)]
pub enum GuardedValue {
    /// Read the value from a register, optionally at a nested path.
    Preset { key: String, path: Option<String> },
    /// Use the supplied literal as-is.
    Custom(Value),
}

impl GuardedValue {
    /// Parse the guarded field `field` out of a tool's arguments.
    ///
    /// The field must be an object carrying exactly one arm:
    /// `{"register": <key>, "path"?: <dotted>}` or `{"literal": <value>}`.
    pub fn parse(args: &Value, field: &str) -> Result<Self, InputError> {
        let choice = match args.get(field) {
            Some(Value::Object(map)) => map,
            _ => return Err(InputError::Missing(field.to_string())),
        };

        let register = choice.get("register").and_then(|v| v.as_str());
        let literal = choice.get("literal");

        match (register, literal) {
            (Some(_), Some(_)) => Err(InputError::Ambiguous(field.to_string())),
            (Some(key), None) => Ok(GuardedValue::Preset {
                key: key.to_string(),
                path: choice.get("path").and_then(|v| v.as_str()).map(String::from),
            }),
            (None, Some(value)) => Ok(GuardedValue::Custom(value.clone())),
            (None, None) => Err(InputError::Missing(field.to_string())),
        }
    }

    /// Resolve to a concrete value. Presets read through the store,
    /// never through model-restated text; literals pass through as-is.
    pub fn resolve(&self, registers: &RegisterStore) -> Result<Value, RegisterError> {
        match self {
            GuardedValue::Preset { key, path } => match path {
                Some(path) => registers.get_path(key, path),
                None => registers.get(key).map(|entry| entry.value),
            },
            GuardedValue::Custom(value) => Ok(value.clone()),
        }
    }
}

/// JSON-Schema fragment for a guarded parameter, so every sensitive
/// tool declares the two-armed choice identically.
pub fn guarded_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
        "oneOf": [
            {
                "properties": {
                    "register": {
                        "type": "string",
                        "description": "Register key to read the value from"
                    },
                    "path": {
                        "type": "string",
                        "description": "Optional dotted path within the register value"
                    }
                },
                "required": ["register"],
                "additionalProperties": false
            },
            {
                "properties": {
                    "literal": {
                        "description": "Fully specified literal value"
                    }
                },
                "required": ["literal"],
                "additionalProperties": false
            }
        ]
    })
}
