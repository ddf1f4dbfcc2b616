//! Validation module for pre-execution checking.
//!
//! Descriptors are validated before any pixel work starts. Invalid ones are
//! dropped and reported; they never reach execution.

pub mod pipeline;
pub mod stages;

pub use pipeline::ValidationPipeline;
pub use stages::{DescriptorStage, SupportedOperation, TypeNormalization, UnusedParameters};
