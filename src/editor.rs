//! End-to-end editing run: load, apply the pipeline, save, display.

use crate::core::error::{ConfigError, RetouchResult};
use crate::execution::{ExecutionOptions, ExecutionResult, OperationPipeline};
use crate::io::{
    load_image, prepare_output_path, save_image, show_image, EditorConfig, ImageViewer,
    SystemViewer,
};
use log::{info, warn};
use std::path::PathBuf;

/// What an editing run produced.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// Pipeline result, including the final image and per-step outcomes.
    pub result: ExecutionResult,
    /// Where the image was written, if an output was configured.
    pub saved_to: Option<PathBuf>,
    /// Preview handed to the viewer, if display was requested and succeeded.
    pub displayed: Option<PathBuf>,
}

/// Loads the configured input, runs its operations and writes the result.
pub struct ImageEditor {
    config: EditorConfig,
    pipeline: OperationPipeline,
    viewer: Box<dyn ImageViewer>,
}

impl ImageEditor {
    /// Create an editor with the built-in operations.
    pub fn new(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            pipeline: OperationPipeline::with_builtins(),
            viewer: Box::new(SystemViewer),
        })
    }

    /// Use a custom pipeline (e.g. with extra registered operations).
    pub fn with_pipeline(mut self, pipeline: OperationPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Show results with a different viewer than the system default.
    pub fn with_viewer(mut self, viewer: impl ImageViewer + 'static) -> Self {
        self.viewer = Box::new(viewer);
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &OperationPipeline {
        &self.pipeline
    }

    /// Run the whole edit.
    ///
    /// A load failure is fatal and nothing is run. Failed operations are
    /// reported in the outcome and do not stop the run. A display failure
    /// is only fatal when there is no output file to fall back on.
    pub fn run(&self, options: Option<ExecutionOptions>) -> RetouchResult<EditOutcome> {
        let input = self.config.input_path()?;
        let image = load_image(input)?;
        info!("Loaded {} with shape {}", input.display(), image.shape());

        let result = self.pipeline.run(image, &self.config.operations, options);
        info!(
            "{} step(s) applied, {} failed, {} dropped",
            result.stats.steps_applied, result.stats.steps_failed, result.stats.descriptors_dropped
        );

        let saved_to = match self.config.output_path() {
            Some(output) => {
                let target = prepare_output_path(output, self.config.overwrite)?;
                save_image(&result.image, &target)?;
                info!("Saved result to {}", target.display());
                Some(target)
            }
            None => None,
        };

        let displayed = if self.config.display {
            match show_image(&result.image, self.viewer.as_ref()) {
                Ok(preview) => {
                    info!("Opened preview {}", preview.display());
                    Some(preview)
                }
                Err(e) if saved_to.is_some() => {
                    warn!("Result saved but not shown: {}", e);
                    None
                }
                Err(e) => return Err(e),
            }
        } else {
            None
        };

        Ok(EditOutcome {
            result,
            saved_to,
            displayed,
        })
    }
}
