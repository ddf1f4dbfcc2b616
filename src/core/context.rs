//! Operation context.
//!
//! The context gives an operator constructor typed access to the parameters
//! of its descriptor and turns absent or mistyped fields into the matching
//! [`OperationError`].

use crate::core::error::OperationError;
use crate::core::types::{OperationDescriptor, Value};
use indexmap::IndexMap;

/// Parameters of one descriptor, as seen by an operator constructor.
#[derive(Debug, Clone, Copy)]
pub struct OperationContext<'a> {
    /// Normalised operation type.
    pub operation: &'a str,
    parameters: &'a IndexMap<String, Value>,
}

impl<'a> OperationContext<'a> {
    /// Create a context over a parameter map.
    pub fn new(operation: &'a str, parameters: &'a IndexMap<String, Value>) -> Self {
        Self {
            operation,
            parameters,
        }
    }

    /// Create a context over a validated descriptor.
    pub fn from_descriptor(descriptor: &'a OperationDescriptor) -> Self {
        Self::new(&descriptor.op_type, &descriptor.params)
    }

    /// Get all parameters.
    pub fn parameters(&self) -> &IndexMap<String, Value> {
        self.parameters
    }

    /// Check if a parameter is present.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    // ========================================================================
    // Parameter Getters
    // ========================================================================

    /// Get a parameter value by name.
    pub fn get_parameter(&self, name: &str) -> Result<&'a Value, OperationError> {
        self.parameters
            .get(name)
            .ok_or_else(|| OperationError::MissingParameter {
                operation: self.operation.to_string(),
                parameter: name.to_string(),
            })
    }

    /// Get a parameter as an integer.
    pub fn get_integer(&self, name: &str) -> Result<i64, OperationError> {
        let value = self.get_parameter(name)?;
        value.as_integer().ok_or_else(|| {
            OperationError::invalid(
                self.operation,
                name,
                format!("expected integer, got {} {}", value.get_type(), value),
            )
        })
    }

    /// Get a parameter as a float.
    /// Integers are accepted.
    pub fn get_float(&self, name: &str) -> Result<f64, OperationError> {
        let value = self.get_parameter(name)?;
        value.as_float().ok_or_else(|| {
            OperationError::invalid(
                self.operation,
                name,
                format!("expected number, got {} {}", value.get_type(), value),
            )
        })
    }

    /// Get a parameter as an `f32` sample factor.
    ///
    /// Values that do not fit a finite `f32` are rejected.
    pub fn get_f32(&self, name: &str) -> Result<f32, OperationError> {
        let value = self.get_float(name)?;
        let narrowed = value as f32;
        if !narrowed.is_finite() {
            return Err(OperationError::invalid(
                self.operation,
                name,
                format!("{} is out of range for a finite 32-bit float", value),
            ));
        }
        Ok(narrowed)
    }
}
