//! Descriptor value types.
//!
//! An operation descriptor is a JSON object with a `type` key and
//! operation-specific parameters. Values are kept in an untagged enum so
//! that JSON integers and floats stay distinguishable (`width: 3` is valid,
//! `width: 3.0` is not).

use crate::core::param::ParamType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key holding the operation type in a descriptor.
pub const TYPE_KEY: &str = "type";

/// A descriptor field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON null
    None,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Nested object
    Map(IndexMap<String, Value>),
}

/// A descriptor exactly as it came from configuration.
pub type RawDescriptor = IndexMap<String, Value>;

/// A descriptor that passed validation.
///
/// The `type` key has been normalised (trimmed, lower-cased) and moved to
/// `op_type`; the remaining keys are the operation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Position of the descriptor in the submitted list
    pub source_index: usize,
    /// Normalised operation type
    pub op_type: String,
    /// Operation parameters
    pub params: IndexMap<String, Value>,
}

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Get the type of this value.
    pub fn get_type(&self) -> ParamType {
        match self {
            Value::None => ParamType::None,
            Value::Boolean(_) => ParamType::Boolean,
            Value::Integer(_) => ParamType::Integer,
            Value::Float(_) => ParamType::Float,
            Value::String(_) => ParamType::String,
            Value::Array(_) => ParamType::Array,
            Value::Map(_) => ParamType::Map,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a float.
    /// Integers are automatically converted to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_string(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Check if this is the null value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Array(arr) => write!(f, "Array[{}]", arr.len()),
            Value::Map(map) => write!(f, "Map{{{} entries}}", map.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

// ============================================================================
// OperationDescriptor Implementation
// ============================================================================

impl OperationDescriptor {
    /// Create a descriptor with no parameters.
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            source_index: 0,
            op_type: op_type.into(),
            params: IndexMap::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set the position in the submitted list.
    pub fn at_index(mut self, source_index: usize) -> Self {
        self.source_index = source_index;
        self
    }
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op_type)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "({})", params.join(", "))?;
        }
        Ok(())
    }
}
