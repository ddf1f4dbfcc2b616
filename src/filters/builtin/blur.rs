//! Blur filters: Box blur and unsharp-mask sharpening built on it

use crate::core::buffer::PixelBuffer;
use crate::core::context::OperationContext;
use crate::core::error::OperationError;
use crate::core::operation::{Category, ConfigurableOperation, ImageOperation, OperationMetadata};
use crate::core::param::{ParamType, ParameterDefinition};
use crate::filters::registry::FilterRegistry;
use crate::filters::window;

/// Kernel size of the blur that `Sharpen` subtracts.
pub const SHARPEN_BLUR_SIZE: usize = 5;

/// Register blur filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register::<BoxBlur>();
    registry.register::<Sharpen>();
}

/// Averages each `width × height` neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxBlur {
    width: usize,
    height: usize,
}

impl BoxBlur {
    /// Create a box blur; both dimensions must be odd and positive.
    pub fn new(width: i64, height: i64) -> Result<Self, OperationError> {
        Ok(Self {
            width: odd_extent("width", width)?,
            height: odd_extent("height", height)?,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

fn odd_extent(parameter: &str, value: i64) -> Result<usize, OperationError> {
    if value <= 0 || value % 2 == 0 {
        return Err(OperationError::invalid(
            "blur",
            parameter,
            format!("must be an odd positive integer, got {}", value),
        ));
    }
    usize::try_from(value)
        .map_err(|_| OperationError::invalid("blur", parameter, "kernel too large"))
}

impl ImageOperation for BoxBlur {
    fn id(&self) -> &'static str {
        "blur"
    }

    fn apply(&self, image: &PixelBuffer) -> Result<PixelBuffer, OperationError> {
        let sums = window::window_sum(image, self.height, self.width).map_err(|error| {
            OperationError::Buffer {
                operation: self.id().to_string(),
                error,
            }
        })?;
        let count = (self.width as f64 * self.height as f64) as f32;
        Ok(sums.map(|v| v / count).clamp_unit())
    }
}

impl ConfigurableOperation for BoxBlur {
    fn metadata() -> OperationMetadata {
        OperationMetadata::builder("blur", "Box Blur")
            .description("Average every sample over a width x height window with replicated edges")
            .category(Category::Blur)
            .parameter(
                ParameterDefinition::new("width", ParamType::Integer)
                    .with_description("Horizontal kernel size")
                    .with_hint("odd, >= 1"),
            )
            .parameter(
                ParameterDefinition::new("height", ParamType::Integer)
                    .with_description("Vertical kernel size")
                    .with_hint("odd, >= 1"),
            )
            .build()
    }

    fn from_context(ctx: &OperationContext<'_>) -> Result<Self, OperationError> {
        Self::new(ctx.get_integer("width")?, ctx.get_integer("height")?)
    }
}

/// Unsharp masking: `image + alpha * (image - blur5x5(image))`.
///
/// Negative `alpha` softens the image instead of sharpening it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpen {
    alpha: f32,
    blur: BoxBlur,
}

impl Sharpen {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            blur: BoxBlur {
                width: SHARPEN_BLUR_SIZE,
                height: SHARPEN_BLUR_SIZE,
            },
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl ImageOperation for Sharpen {
    fn id(&self) -> &'static str {
        "sharpen"
    }

    fn apply(&self, image: &PixelBuffer) -> Result<PixelBuffer, OperationError> {
        let blurred = self.blur.apply(image)?;
        let samples = image
            .samples()
            .iter()
            .zip(blurred.samples())
            .map(|(&v, &b)| (v + self.alpha * (v - b)).clamp(0.0, 1.0))
            .collect();
        image.with_samples(samples).map_err(|error| OperationError::Buffer {
            operation: self.id().to_string(),
            error,
        })
    }
}

impl ConfigurableOperation for Sharpen {
    fn metadata() -> OperationMetadata {
        OperationMetadata::builder("sharpen", "Sharpen")
            .description("Unsharp mask against a 5x5 box blur")
            .category(Category::Sharpen)
            .parameter(
                ParameterDefinition::new("alpha", ParamType::Float)
                    .with_description("Sharpening strength; negative values soften")
                    .with_hint("typically (0, 2]"),
            )
            .build()
    }

    fn from_context(ctx: &OperationContext<'_>) -> Result<Self, OperationError> {
        Ok(Self::new(ctx.get_f32("alpha")?))
    }
}
