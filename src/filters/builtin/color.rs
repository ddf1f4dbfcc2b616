//! Color adjustment filters: pointwise, no windowing

use crate::core::buffer::PixelBuffer;
use crate::core::context::OperationContext;
use crate::core::error::OperationError;
use crate::core::operation::{Category, ConfigurableOperation, ImageOperation, OperationMetadata};
use crate::core::param::{ParamType, ParameterDefinition};
use crate::filters::registry::FilterRegistry;

/// Perceptual luma weights for R, G, B.
pub const LUMA_WEIGHTS: [f32; 3] = [0.2989, 0.5870, 0.1140];

/// Register color filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register::<Brightness>();
    registry.register::<Contrast>();
    registry.register::<Saturation>();
}

fn value_parameter(description: &str) -> ParameterDefinition {
    ParameterDefinition::new("value", ParamType::Float)
        .with_description(description)
        .with_hint("1.0 = unchanged")
}

/// Scales every sample: `clamp(v * value)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brightness {
    value: f32,
}

impl Brightness {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl ImageOperation for Brightness {
    fn id(&self) -> &'static str {
        "brightness"
    }

    fn apply(&self, image: &PixelBuffer) -> Result<PixelBuffer, OperationError> {
        Ok(image.map(|v| (v * self.value).clamp(0.0, 1.0)))
    }
}

impl ConfigurableOperation for Brightness {
    fn metadata() -> OperationMetadata {
        OperationMetadata::builder("brightness", "Brightness")
            .description("Multiply every sample by a factor")
            .category(Category::Color)
            .parameter(value_parameter(
                "Brightness multiplier (> 1.0 brightens, < 1.0 darkens)",
            ))
            .build()
    }

    fn from_context(ctx: &OperationContext<'_>) -> Result<Self, OperationError> {
        Ok(Self::new(ctx.get_f32("value")?))
    }
}

/// Stretches samples around mid-gray: `clamp((v - 0.5) * value + 0.5)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contrast {
    value: f32,
}

impl Contrast {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl ImageOperation for Contrast {
    fn id(&self) -> &'static str {
        "contrast"
    }

    fn apply(&self, image: &PixelBuffer) -> Result<PixelBuffer, OperationError> {
        Ok(image.map(|v| ((v - 0.5) * self.value + 0.5).clamp(0.0, 1.0)))
    }
}

impl ConfigurableOperation for Contrast {
    fn metadata() -> OperationMetadata {
        OperationMetadata::builder("contrast", "Contrast")
            .description("Scale samples around mid-gray")
            .category(Category::Color)
            .parameter(value_parameter(
                "Contrast factor (> 1.0 increases, < 1.0 decreases)",
            ))
            .build()
    }

    fn from_context(ctx: &OperationContext<'_>) -> Result<Self, OperationError> {
        Ok(Self::new(ctx.get_f32("value")?))
    }
}

/// Blends RGB pixels with their luma: `clamp(luma * (1 - value) + v * value)`.
///
/// Only three-channel images are affected; anything else passes through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saturation {
    value: f32,
}

impl Saturation {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl ImageOperation for Saturation {
    fn id(&self) -> &'static str {
        "saturation"
    }

    fn apply(&self, image: &PixelBuffer) -> Result<PixelBuffer, OperationError> {
        if image.channels() != 3 {
            return Ok(image.clone());
        }

        let s = self.value;
        let mut samples = Vec::with_capacity(image.samples().len());
        for px in image.samples().chunks_exact(3) {
            let luma = px[0] * LUMA_WEIGHTS[0] + px[1] * LUMA_WEIGHTS[1] + px[2] * LUMA_WEIGHTS[2];
            samples.extend(px.iter().map(|&v| (luma * (1.0 - s) + v * s).clamp(0.0, 1.0)));
        }
        image.with_samples(samples).map_err(|error| OperationError::Buffer {
            operation: self.id().to_string(),
            error,
        })
    }
}

impl ConfigurableOperation for Saturation {
    fn metadata() -> OperationMetadata {
        OperationMetadata::builder("saturation", "Saturation")
            .description("Interpolate RGB images between their luma and full color")
            .category(Category::Color)
            .parameter(value_parameter(
                "Saturation factor (0.0 = grayscale, > 1.0 more vivid)",
            ))
            .build()
    }

    fn from_context(ctx: &OperationContext<'_>) -> Result<Self, OperationError> {
        Ok(Self::new(ctx.get_f32("value")?))
    }
}
