//! Edge detection: Sobel gradient magnitude

use crate::core::buffer::PixelBuffer;
use crate::core::context::OperationContext;
use crate::core::error::OperationError;
use crate::core::operation::{Category, ConfigurableOperation, ImageOperation, OperationMetadata};
use crate::filters::registry::FilterRegistry;
use crate::filters::window::{self, Kernel};

const SOBEL_KERNEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Register edge filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register::<Sobel>();
}

/// Per-channel Sobel gradient magnitude `sqrt(gx² + gy²)`, clamped to [0, 1].
///
/// Magnitudes are clamped, not rescaled by the image maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Sobel {
    kernel_x: Kernel,
    kernel_y: Kernel,
}

impl Sobel {
    pub fn new() -> Self {
        Self {
            kernel_x: Kernel::from_3x3(SOBEL_KERNEL_X),
            kernel_y: Kernel::from_3x3(SOBEL_KERNEL_Y),
        }
    }
}

impl Default for Sobel {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageOperation for Sobel {
    fn id(&self) -> &'static str {
        "sobel"
    }

    fn apply(&self, image: &PixelBuffer) -> Result<PixelBuffer, OperationError> {
        let to_op_error = |error| OperationError::Buffer {
            operation: "sobel".to_string(),
            error,
        };
        let gx = window::convolve(image, &self.kernel_x).map_err(to_op_error)?;
        let gy = window::convolve(image, &self.kernel_y).map_err(to_op_error)?;

        let magnitude = gx
            .samples()
            .iter()
            .zip(gy.samples())
            .map(|(&x, &y)| (x * x + y * y).sqrt().clamp(0.0, 1.0))
            .collect();
        image.with_samples(magnitude).map_err(to_op_error)
    }
}

impl ConfigurableOperation for Sobel {
    fn metadata() -> OperationMetadata {
        OperationMetadata::builder("sobel", "Sobel Edges")
            .description("Gradient magnitude of the 3x3 Sobel operator, per channel")
            .category(Category::Edge)
            .build()
    }

    fn from_context(_ctx: &OperationContext<'_>) -> Result<Self, OperationError> {
        Ok(Self::new())
    }
}
