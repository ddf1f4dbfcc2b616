//! Error types for Retouch.
//!
//! Uses thiserror for structured errors with context. Errors are split by
//! the phase that produces them:
//! - `BufferError` for malformed pixel buffers and kernels
//! - `OperationError` for a single operation (scoped to one pipeline step)
//! - `ValidationError` for a descriptor dropped before execution
//! - `ConfigError` and `RetouchError` for the I/O layer around the core

use crate::core::param::ParamType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Retouch.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum RetouchError {
    #[error("Failed to load input image {path}: {error}")]
    Load { path: PathBuf, error: String },

    #[error("Failed to save output image {path}: {error}")]
    Save { path: PathBuf, error: String },

    #[error("Failed to display preview {path}: {error}")]
    Display { path: PathBuf, error: String },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),

    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while building or reshaping a pixel buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferError {
    #[error("Image dimensions must be non-zero, got {height}x{width}")]
    EmptyDimension { height: usize, width: usize },

    #[error("Unsupported channel count {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(usize),

    #[error("Sample count mismatch: shape needs {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Kernel must have odd, positive dimensions, got {height}x{width}")]
    InvalidKernel { height: usize, width: usize },

    #[error("Kernel {height}x{width} needs a padded buffer larger than can be allocated")]
    KernelTooLarge { height: usize, width: usize },

    #[error("Cannot demote a {channels}-channel buffer to two dimensions")]
    NotSingleChannel { channels: usize },
}

/// Errors scoped to a single operation.
///
/// The pipeline reports these per step and carries on with the buffer
/// from before the failed step.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OperationError {
    #[error("Invalid parameter '{parameter}' for '{operation}': {reason}")]
    InvalidParameter {
        operation: String,
        parameter: String,
        reason: String,
    },

    #[error("Missing parameter '{parameter}' for '{operation}'")]
    MissingParameter { operation: String, parameter: String },

    #[error("Unsupported operation '{operation}'")]
    UnsupportedOperation { operation: String },

    #[error("Operation '{operation}' rejected the buffer: {error}")]
    Buffer { operation: String, error: BufferError },
}

/// Errors that cause a descriptor to be dropped during validation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Operation #{index} has no 'type' field")]
    MissingType { index: usize },

    #[error("Operation #{index} has a 'type' of kind {found}, expected a string")]
    InvalidType { index: usize, found: ParamType },

    #[error("Operation #{index} has unsupported type '{op_type}'")]
    UnsupportedOperation { index: usize, op_type: String },
}

/// Errors in the editor configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing '{0}' field in config")]
    MissingField(&'static str),

    #[error("Config must provide either an 'output' path or set 'display' to true")]
    NoOutputTarget,

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl OperationError {
    /// Name of the operation that failed.
    pub fn operation(&self) -> &str {
        match self {
            OperationError::InvalidParameter { operation, .. }
            | OperationError::MissingParameter { operation, .. }
            | OperationError::UnsupportedOperation { operation }
            | OperationError::Buffer { operation, .. } => operation,
        }
    }

    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            OperationError::InvalidParameter { .. } => "invalid_parameter",
            OperationError::MissingParameter { .. } => "missing_parameter",
            OperationError::UnsupportedOperation { .. } => "unsupported_operation",
            OperationError::Buffer { .. } => "invalid_buffer",
        }
    }

    /// Convenience constructor for `InvalidParameter`.
    pub fn invalid(
        operation: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        OperationError::InvalidParameter {
            operation: operation.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

impl ValidationError {
    /// Position of the offending descriptor in the submitted list.
    pub fn index(&self) -> usize {
        match self {
            ValidationError::MissingType { index }
            | ValidationError::InvalidType { index, .. }
            | ValidationError::UnsupportedOperation { index, .. } => *index,
        }
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            ValidationError::MissingType { .. } => {
                Some("Add a \"type\" field naming the operation".to_string())
            }
            ValidationError::InvalidType { .. } => {
                Some("Write the operation type as a string, e.g. \"blur\"".to_string())
            }
            ValidationError::UnsupportedOperation { .. } => {
                Some("Run `retouch list` to see the available operations".to_string())
            }
        }
    }
}

/// Result type alias for Retouch operations.
pub type RetouchResult<T> = Result<T, RetouchError>;

// ============================================================================
// Validation Report
// ============================================================================

/// Outcome of validating a list of operation descriptors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether every descriptor was accepted.
    pub success: bool,
    /// Descriptors that were dropped, one error each.
    pub errors: Vec<ValidationError>,
    /// Non-fatal issues on accepted descriptors.
    pub warnings: Vec<ValidationWarning>,
    /// Number of descriptors that passed.
    pub accepted: usize,
    /// Time taken for validation in milliseconds.
    pub duration_ms: u64,
}

/// Non-fatal validation warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Warning message.
    pub message: String,
    /// Descriptor that triggered the warning, if applicable.
    pub index: Option<usize>,
    /// Suggestion for addressing the warning.
    pub suggestion: Option<String>,
}

impl ValidationReport {
    /// Create a new empty report (success).
    pub fn new() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    /// Record a dropped descriptor.
    pub fn add_error(&mut self, error: ValidationError) {
        self.success = false;
        self.errors.push(error);
    }

    /// Add a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Number of descriptors that were dropped.
    pub fn dropped(&self) -> usize {
        self.errors.len()
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        if self.success {
            if self.warnings.is_empty() {
                format!("✓ {} operation(s) ready", self.accepted)
            } else {
                format!(
                    "✓ {} operation(s) ready with {} warning(s)",
                    self.accepted,
                    self.warnings.len()
                )
            }
        } else {
            format!(
                "⚠ {} operation(s) ready, {} skipped",
                self.accepted,
                self.errors.len()
            )
        }
    }

    /// Get detailed error messages with suggestions.
    pub fn detailed_errors(&self) -> Vec<String> {
        self.errors
            .iter()
            .enumerate()
            .map(|(i, error)| {
                let mut msg = format!("{}. {}", i + 1, error);
                if let Some(fix) = error.suggested_fix() {
                    msg.push_str(&format!("\n   → Suggestion: {}", fix));
                }
                msg
            })
            .collect()
    }
}
