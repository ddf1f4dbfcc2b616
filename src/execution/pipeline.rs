//! Operation pipeline implementation.
//!
//! The pipeline validates a descriptor list and then applies the surviving
//! operations to one image, strictly in order. Each step sees the output of
//! the last successful step; a failed step is recorded and skipped, and the
//! image it was given carries on unchanged.

use crate::core::buffer::PixelBuffer;
use crate::core::context::OperationContext;
use crate::core::error::{OperationError, ValidationReport};
use crate::core::types::{OperationDescriptor, RawDescriptor};
use crate::execution::progress::{ProgressCallback, ProgressTracker, ProgressUpdate};
use crate::filters::registry::FilterRegistry;
use crate::validation::ValidationPipeline;
use log::{debug, error};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Execution options.
#[derive(Clone, Default)]
pub struct ExecutionOptions {
    /// Progress callback.
    pub progress_callback: Option<Arc<ProgressCallback>>,
}

impl std::fmt::Debug for ExecutionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionOptions")
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl ExecutionOptions {
    /// Create a new options builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set progress callback.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(Box::new(callback)));
        self
    }
}

/// How a single step ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    /// The operation ran and its output became the current image.
    Applied { duration: Duration },
    /// The operation could not be built or applied; the image is unchanged.
    Failed { error: OperationError },
}

/// Outcome of one validated descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Position among the validated steps.
    pub index: usize,
    /// Position in the submitted descriptor list.
    pub source_index: usize,
    /// Operation type.
    pub operation: String,
    /// What happened.
    pub status: StepStatus,
}

impl StepOutcome {
    /// Whether the step was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self.status, StepStatus::Applied { .. })
    }

    /// The error, for failed steps.
    pub fn error(&self) -> Option<&OperationError> {
        match &self.status {
            StepStatus::Failed { error } => Some(error),
            StepStatus::Applied { .. } => None,
        }
    }
}

/// Execution statistics.
#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    /// Total execution time.
    pub total_duration: Duration,
    /// Number of steps applied.
    pub steps_applied: usize,
    /// Number of steps that failed.
    pub steps_failed: usize,
    /// Number of descriptors dropped by validation.
    pub descriptors_dropped: usize,
}

/// Result of running a pipeline.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Image after every successful step.
    pub image: PixelBuffer,
    /// Validation report for the descriptor list.
    pub validation: ValidationReport,
    /// One outcome per validated descriptor, in order.
    pub steps: Vec<StepOutcome>,
    /// Execution statistics.
    pub stats: ExecutionStats,
}

impl ExecutionResult {
    /// Failed steps with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&StepOutcome, &OperationError)> {
        self.steps
            .iter()
            .filter_map(|step| step.error().map(|e| (step, e)))
    }

    /// Number of applied steps.
    pub fn applied_count(&self) -> usize {
        self.stats.steps_applied
    }

    /// Number of failed steps.
    pub fn failed_count(&self) -> usize {
        self.stats.steps_failed
    }

    /// Whether nothing was dropped and nothing failed.
    pub fn is_clean(&self) -> bool {
        self.validation.success && self.stats.steps_failed == 0
    }
}

/// Validates descriptor lists and applies them to images.
pub struct OperationPipeline {
    /// Operator factories.
    registry: FilterRegistry,
    /// Descriptor validation stages.
    validation: ValidationPipeline,
    /// Default execution options.
    default_options: ExecutionOptions,
}

impl OperationPipeline {
    /// Create a pipeline over a registry.
    pub fn new(registry: FilterRegistry) -> Self {
        Self {
            registry,
            validation: ValidationPipeline::default_pipeline(),
            default_options: ExecutionOptions::default(),
        }
    }

    /// Create a pipeline with the built-in operations.
    pub fn with_builtins() -> Self {
        Self::new(FilterRegistry::with_builtins())
    }

    /// Replace the validation stages.
    pub fn with_validation(mut self, validation: ValidationPipeline) -> Self {
        self.validation = validation;
        self
    }

    /// Set default options.
    pub fn with_default_options(mut self, options: ExecutionOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FilterRegistry {
        &mut self.registry
    }

    /// Validate a descriptor list against the registry.
    pub fn validate(
        &self,
        descriptors: &[RawDescriptor],
    ) -> (Vec<OperationDescriptor>, ValidationReport) {
        self.validation.validate(descriptors, &self.registry)
    }

    /// Validate and execute a descriptor list.
    pub fn run(
        &self,
        image: PixelBuffer,
        descriptors: &[RawDescriptor],
        options: Option<ExecutionOptions>,
    ) -> ExecutionResult {
        let (operations, report) = self.validate(descriptors);
        let mut result = self.execute(image, &operations, options);
        result.stats.descriptors_dropped = report.dropped();
        result.validation = report;
        result
    }

    /// Execute already validated descriptors.
    ///
    /// Never fails as a whole: every step either replaces the current image
    /// or is recorded as failed.
    pub fn execute(
        &self,
        image: PixelBuffer,
        operations: &[OperationDescriptor],
        options: Option<ExecutionOptions>,
    ) -> ExecutionResult {
        let options = options.unwrap_or_else(|| self.default_options.clone());
        let start_time = Instant::now();

        let mut tracker = ProgressTracker::new(operations.len());
        if let Some(callback) = &options.progress_callback {
            tracker = tracker.with_callback(callback.clone());
        }
        tracker.start();

        let mut current = image;
        let mut steps = Vec::with_capacity(operations.len());
        let mut stats = ExecutionStats::default();

        for (index, descriptor) in operations.iter().enumerate() {
            let operation = descriptor.op_type.as_str();
            tracker.step_started(index, operation);

            let step_start = Instant::now();
            let status = match self.apply_step(&current, descriptor) {
                Ok(next) => {
                    let duration = step_start.elapsed();
                    debug!("Applied {} in {:?}", descriptor, duration);
                    tracker.step_completed(index, operation, duration.as_millis() as u64);
                    stats.steps_applied += 1;
                    current = next;
                    StepStatus::Applied { duration }
                }
                Err(err) => {
                    error!("Failed operation '{}': {}", operation, err);
                    tracker.step_failed(index, operation, err.to_string());
                    stats.steps_failed += 1;
                    StepStatus::Failed { error: err }
                }
            };

            steps.push(StepOutcome {
                index,
                source_index: descriptor.source_index,
                operation: operation.to_string(),
                status,
            });
        }

        stats.total_duration = start_time.elapsed();
        tracker.complete();

        let mut validation = ValidationReport::new();
        validation.accepted = operations.len();

        ExecutionResult {
            image: current,
            validation,
            steps,
            stats,
        }
    }

    /// Build the operator for one descriptor and apply it.
    fn apply_step(
        &self,
        image: &PixelBuffer,
        descriptor: &OperationDescriptor,
    ) -> Result<PixelBuffer, OperationError> {
        let ctx = OperationContext::from_descriptor(descriptor);
        let operation = self.registry.create(&ctx)?;
        operation.apply(image)
    }
}

impl Default for OperationPipeline {
    fn default() -> Self {
        Self::with_builtins()
    }
}
