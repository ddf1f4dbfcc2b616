//! # Retouch - Pixel-level Image Editing
//!
//! Retouch applies an ordered list of operations to a single raster image:
//! spatial filters (box blur, unsharp-mask sharpening, Sobel edges) and
//! pointwise colour adjustments (brightness, contrast, saturation).
//!
//! ## Features
//!
//! - **Windowed filters**: one sliding-window primitive with edge replication,
//!   shared by every spatial filter and parallelised across rows
//! - **Rank-preserving buffers**: 2-D grayscale input comes back 2-D from every operator
//! - **Fault-tolerant pipeline**: invalid descriptors are dropped up front, a failing
//!   step is skipped and reported while the rest still run
//! - **Extensible**: register custom operations through the `ConfigurableOperation` trait
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use retouch::prelude::*;
//!
//! let image = load_image("input.png")?;
//! let operations: Vec<RawDescriptor> = serde_json::from_str(r#"[
//!     {"type": "blur", "width": 3, "height": 3},
//!     {"type": "sharpen", "alpha": 0.8}
//! ]"#)?;
//!
//! let pipeline = OperationPipeline::with_builtins();
//! let result = pipeline.run(image, &operations, None);
//! for (step, error) in result.failures() {
//!     eprintln!("step {} skipped: {}", step.source_index, error);
//! }
//! save_image(&result.image, "output.png")?;
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: pixel buffers, descriptor values, operation traits, errors
//! - [`filters`]: the windowing primitive, the registry and built-in operators
//! - [`validation`]: descriptor validation stages
//! - [`execution`]: the operation pipeline and progress reporting
//! - [`io`]: config files, image decode/encode, output paths, result preview
//! - [`editor`]: the end-to-end load/run/save/display workflow
//!
//! ## Creating Custom Operations
//!
//! ```rust,ignore
//! use retouch::prelude::*;
//!
//! #[derive(Debug)]
//! struct Invert;
//!
//! impl ImageOperation for Invert {
//!     fn id(&self) -> &'static str {
//!         "invert"
//!     }
//!
//!     fn apply(&self, image: &PixelBuffer) -> Result<PixelBuffer, OperationError> {
//!         Ok(image.map(|v| 1.0 - v))
//!     }
//! }
//!
//! impl ConfigurableOperation for Invert {
//!     fn metadata() -> OperationMetadata {
//!         OperationMetadata::builder("invert", "Invert").build()
//!     }
//!
//!     fn from_context(_ctx: &OperationContext<'_>) -> Result<Self, OperationError> {
//!         Ok(Invert)
//!     }
//! }
//!
//! let mut pipeline = OperationPipeline::with_builtins();
//! pipeline.registry_mut().register::<Invert>();
//! ```

#![warn(clippy::all)]

pub mod core;
pub mod editor;
pub mod execution;
pub mod filters;
pub mod io;
pub mod validation;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use retouch::prelude::*;
/// ```
pub mod prelude {
    // Buffers
    pub use crate::core::buffer::{PixelBuffer, Rank, Shape};

    // Descriptors and parameters
    pub use crate::core::param::{ParamType, ParameterDefinition};
    pub use crate::core::types::{OperationDescriptor, RawDescriptor, Value};

    // Operation traits and types
    pub use crate::core::context::OperationContext;
    pub use crate::core::operation::{
        Category, ConfigurableOperation, ImageOperation, OperationMetadata,
    };

    // Errors
    pub use crate::core::error::{
        BufferError, ConfigError, OperationError, RetouchError, RetouchResult, ValidationError,
        ValidationReport, ValidationWarning,
    };

    // Validation
    pub use crate::validation::{
        DescriptorStage, SupportedOperation, TypeNormalization, UnusedParameters,
        ValidationPipeline,
    };

    // Execution
    pub use crate::execution::{
        ExecutionOptions, ExecutionResult, ExecutionStats, OperationPipeline, ProgressCallback,
        ProgressTracker, ProgressUpdate, StepOutcome, StepStatus,
    };

    // Filters
    pub use crate::filters::registry::{FilterRegistry, OperationFactory, RegistryEntry};
    pub use crate::filters::window::{convolve, slide_window, window_sum, Kernel};

    // Built-in operations
    pub use crate::filters::builtin::{
        // Blur
        BoxBlur, Sharpen,
        // Edge
        Sobel,
        // Color
        Brightness, Contrast, Saturation,
    };

    // I/O and editor
    pub use crate::editor::{EditOutcome, ImageEditor};
    pub use crate::io::{load_image, save_image, EditorConfig, ImageViewer, SystemViewer};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
