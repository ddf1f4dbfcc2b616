//! Execution module.
//!
//! This module runs validated operation lists against an image.

pub mod pipeline;
pub mod progress;

pub use pipeline::{
    ExecutionOptions, ExecutionResult, ExecutionStats, OperationPipeline, StepOutcome, StepStatus,
};
pub use progress::{ProgressCallback, ProgressTracker, ProgressUpdate};
