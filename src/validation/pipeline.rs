//! Validation pipeline implementation.

use crate::core::error::ValidationReport;
use crate::core::types::{OperationDescriptor, RawDescriptor, TYPE_KEY};
use crate::filters::registry::FilterRegistry;
use crate::validation::stages::{
    descriptor_type, DescriptorStage, SupportedOperation, TypeNormalization, UnusedParameters,
};
use log::warn;
use std::time::Instant;

/// Multi-stage descriptor validation.
///
/// Runs every stage over every descriptor. A descriptor that fails any
/// stage is logged and dropped; the rest are returned in their original
/// order as [`OperationDescriptor`]s.
pub struct ValidationPipeline {
    stages: Vec<Box<dyn DescriptorStage>>,
}

impl ValidationPipeline {
    /// Create a new pipeline with the given stages.
    pub fn new(stages: Vec<Box<dyn DescriptorStage>>) -> Self {
        Self { stages }
    }

    /// Create the default validation pipeline with all standard stages.
    pub fn default_pipeline() -> Self {
        Self {
            stages: vec![
                Box::new(TypeNormalization),
                Box::new(SupportedOperation),
                Box::new(UnusedParameters),
            ],
        }
    }

    /// Create a minimal pipeline (type normalisation and support check).
    pub fn minimal_pipeline() -> Self {
        Self {
            stages: vec![Box::new(TypeNormalization), Box::new(SupportedOperation)],
        }
    }

    /// Add a custom validation stage.
    pub fn add_stage(&mut self, stage: Box<dyn DescriptorStage>) {
        self.stages.push(stage);
    }

    /// Names of the configured stages, in run order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Validate a descriptor list.
    pub fn validate(
        &self,
        descriptors: &[RawDescriptor],
        registry: &FilterRegistry,
    ) -> (Vec<OperationDescriptor>, ValidationReport) {
        let start = Instant::now();
        let mut report = ValidationReport::new();
        let mut accepted = Vec::with_capacity(descriptors.len());

        'descriptors: for (index, raw) in descriptors.iter().enumerate() {
            let mut descriptor = raw.clone();
            let mut warnings = Vec::new();

            for stage in &self.stages {
                match stage.check(index, &mut descriptor, registry) {
                    Ok(stage_warnings) => warnings.extend(stage_warnings),
                    Err(error) => {
                        warn!("Skipping operation: {} ({})", error, stage.name());
                        report.add_error(error);
                        continue 'descriptors;
                    }
                }
            }

            let op_type = descriptor_type(&descriptor).unwrap_or_default().to_string();
            descriptor.shift_remove(TYPE_KEY);
            accepted.push(OperationDescriptor {
                source_index: index,
                op_type,
                params: descriptor,
            });
            for warning in warnings {
                report.add_warning(warning);
            }
        }

        report.accepted = accepted.len();
        report.duration_ms = start.elapsed().as_millis() as u64;
        (accepted, report)
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}
