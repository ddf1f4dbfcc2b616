//! Individual validation stages.
//!
//! Each stage checks one descriptor for a specific category of problems.
//! A stage may rewrite the descriptor in place (type normalisation) so that
//! later stages see the cleaned-up form.

use crate::core::error::{ValidationError, ValidationWarning};
use crate::core::types::{RawDescriptor, Value, TYPE_KEY};
use crate::filters::registry::FilterRegistry;

/// Trait for descriptor validation stages.
pub trait DescriptorStage: Send + Sync {
    /// Name of this validation stage.
    fn name(&self) -> &str;

    /// Check the descriptor at position `index`.
    ///
    /// Returns Ok with warnings, or Err when the descriptor must be dropped.
    fn check(
        &self,
        index: usize,
        descriptor: &mut RawDescriptor,
        registry: &FilterRegistry,
    ) -> Result<Vec<ValidationWarning>, ValidationError>;
}

/// Read the `type` of a descriptor that already went through
/// [`TypeNormalization`].
pub(crate) fn descriptor_type(descriptor: &RawDescriptor) -> Option<&str> {
    descriptor.get(TYPE_KEY).and_then(Value::as_string)
}

/// Type normalisation - requires a string `type` and trims/lower-cases it.
pub struct TypeNormalization;

impl DescriptorStage for TypeNormalization {
    fn name(&self) -> &str {
        "Type Normalization"
    }

    fn check(
        &self,
        index: usize,
        descriptor: &mut RawDescriptor,
        _registry: &FilterRegistry,
    ) -> Result<Vec<ValidationWarning>, ValidationError> {
        let value = descriptor
            .get_mut(TYPE_KEY)
            .ok_or(ValidationError::MissingType { index })?;

        let normalized = match value {
            Value::String(s) => s.trim().to_lowercase(),
            other => {
                return Err(ValidationError::InvalidType {
                    index,
                    found: other.get_type(),
                })
            }
        };
        *value = Value::String(normalized);
        Ok(Vec::new())
    }
}

/// Supported-operation check - the type must name an enabled registry entry.
pub struct SupportedOperation;

impl DescriptorStage for SupportedOperation {
    fn name(&self) -> &str {
        "Supported Operation"
    }

    fn check(
        &self,
        index: usize,
        descriptor: &mut RawDescriptor,
        registry: &FilterRegistry,
    ) -> Result<Vec<ValidationWarning>, ValidationError> {
        let op_type = descriptor_type(descriptor).unwrap_or_default();
        if registry.is_enabled(op_type) {
            Ok(Vec::new())
        } else {
            Err(ValidationError::UnsupportedOperation {
                index,
                op_type: op_type.to_string(),
            })
        }
    }
}

/// Parameter review - warns about undeclared or mistyped fields.
///
/// Never drops a descriptor: a mistyped required field still fails at
/// execution time, scoped to that step.
pub struct UnusedParameters;

impl DescriptorStage for UnusedParameters {
    fn name(&self) -> &str {
        "Unused Parameters"
    }

    fn check(
        &self,
        index: usize,
        descriptor: &mut RawDescriptor,
        registry: &FilterRegistry,
    ) -> Result<Vec<ValidationWarning>, ValidationError> {
        let Some(metadata) = descriptor_type(descriptor).and_then(|t| registry.get_metadata(t))
        else {
            return Ok(Vec::new());
        };

        let mut warnings = Vec::new();
        for (key, value) in descriptor.iter().filter(|(k, _)| k.as_str() != TYPE_KEY) {
            match metadata.get_parameter(key) {
                None => {
                    let expected = metadata.parameter_names();
                    warnings.push(ValidationWarning {
                        message: format!("'{}' ignores field '{}'", metadata.id, key),
                        index: Some(index),
                        suggestion: Some(if expected.is_empty() {
                            format!("'{}' takes no parameters", metadata.id)
                        } else {
                            format!("Expected fields: {}", expected.join(", "))
                        }),
                    });
                }
                Some(param) => {
                    if let Err(message) = param.validate(value) {
                        warnings.push(ValidationWarning {
                            message: format!("'{}': {}", metadata.id, message),
                            index: Some(index),
                            suggestion: param.hint.clone(),
                        });
                    }
                }
            }
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawDescriptor {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_type_normalization() {
        let registry = FilterRegistry::with_builtins();
        let mut desc = raw(r#"{"type": "  BluR ", "width": 3}"#);
        assert!(TypeNormalization.check(0, &mut desc, &registry).is_ok());
        assert_eq!(descriptor_type(&desc), Some("blur"));
    }

    #[test]
    fn test_missing_and_invalid_type() {
        let registry = FilterRegistry::with_builtins();

        let mut missing = raw(r#"{"width": 3}"#);
        assert_eq!(
            TypeNormalization.check(4, &mut missing, &registry),
            Err(ValidationError::MissingType { index: 4 })
        );

        let mut numeric = raw(r#"{"type": 7}"#);
        assert!(matches!(
            TypeNormalization.check(1, &mut numeric, &registry),
            Err(ValidationError::InvalidType { index: 1, .. })
        ));
    }

    #[test]
    fn test_supported_operation() {
        let mut registry = FilterRegistry::with_builtins();
        let mut desc = raw(r#"{"type": "sobel"}"#);
        assert!(SupportedOperation.check(0, &mut desc, &registry).is_ok());

        registry.set_enabled("sobel", false);
        assert!(SupportedOperation.check(0, &mut desc, &registry).is_err());

        let mut unknown = raw(r#"{"type": "emboss"}"#);
        assert_eq!(
            SupportedOperation.check(2, &mut unknown, &registry),
            Err(ValidationError::UnsupportedOperation {
                index: 2,
                op_type: "emboss".to_string(),
            })
        );
    }

    #[test]
    fn test_unused_parameters_warn_only() {
        let registry = FilterRegistry::with_builtins();
        let mut desc = raw(r#"{"type": "sobel", "strength": 2}"#);
        let warnings = UnusedParameters.check(0, &mut desc, &registry).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("strength"));

        let mut clean = raw(r#"{"type": "blur", "width": 3, "height": 3}"#);
        assert!(UnusedParameters.check(0, &mut clean, &registry).unwrap().is_empty());
    }

    #[test]
    fn test_mistyped_parameter_warns() {
        let registry = FilterRegistry::with_builtins();
        let mut desc = raw(r#"{"type": "blur", "width": 3.0, "height": 3}"#);
        let warnings = UnusedParameters.check(3, &mut desc, &registry).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].index, Some(3));
        assert!(warnings[0].message.contains("expects integer"));

        // Integers are fine where floats are expected.
        let mut alpha = raw(r#"{"type": "sharpen", "alpha": 1}"#);
        assert!(UnusedParameters.check(0, &mut alpha, &registry).unwrap().is_empty());
    }
}
