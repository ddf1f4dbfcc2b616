//! Core types and traits for the Retouch image processing system.
//!
//! This module contains the foundational types that every operation and
//! the pipeline build on:
//! - Pixel buffers and shapes
//! - Descriptor values and parameter definitions
//! - Operation traits and metadata
//! - Error types
//! - The operation context

pub mod buffer;
pub mod context;
pub mod error;
pub mod operation;
pub mod param;
pub mod types;

// Re-export commonly used types
pub use buffer::{PixelBuffer, Rank, Shape};
pub use context::OperationContext;
pub use error::{
    BufferError, ConfigError, OperationError, RetouchError, RetouchResult, ValidationError,
};
pub use operation::{Category, ConfigurableOperation, ImageOperation, OperationMetadata};
pub use param::{ParamType, ParameterDefinition};
pub use types::{OperationDescriptor, RawDescriptor, Value};
