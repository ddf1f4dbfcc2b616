//! Parameter definitions for operations.
//!
//! Parameters are the operation-specific fields of a descriptor (`width`,
//! `alpha`, `value`, ...). Their definitions drive the `info` listing and the
//! parameter checks of the validation stage.

use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a descriptor value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Integer,
    Float,
    Boolean,
    String,
    Array,
    Map,
    None,
}

impl ParamType {
    /// Check whether a value can be used where this type is expected.
    ///
    /// Integers are accepted where floats are expected, not the reverse.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value.get_type()) {
            (ParamType::Float, ParamType::Integer) => true,
            (expected, got) => *expected == got,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Integer => "integer",
            ParamType::Float => "float",
            ParamType::Boolean => "boolean",
            ParamType::String => "string",
            ParamType::Array => "array",
            ParamType::Map => "map",
            ParamType::None => "null",
        };
        f.write_str(name)
    }
}

/// Definition of an operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Key in the descriptor
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Expected type
    pub param_type: ParamType,
    /// Description for documentation
    pub description: String,
    /// Accepted range or shape, for documentation only
    pub hint: Option<String>,
}

impl ParameterDefinition {
    /// Create a new parameter definition.
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        let name = name.into();
        Self {
            display_name: Self::name_to_display(&name),
            name,
            param_type,
            description: String::new(),
            hint: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the range/shape hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Validate a value against this parameter's type.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if !self.param_type.matches(value) {
            return Err(format!(
                "parameter '{}' expects {}, got {}",
                self.name,
                self.param_type,
                value.get_type()
            ));
        }
        Ok(())
    }

    /// Convert snake_case name to Title Case display name.
    fn name_to_display(name: &str) -> String {
        name.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
