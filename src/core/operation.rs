//! Operation traits and metadata.
//!
//! [`ImageOperation`] is the core abstraction for every filter and
//! adjustment: a configured operator that maps one [`PixelBuffer`] to a new
//! one. [`ConfigurableOperation`] adds the static side used by the registry:
//! metadata and construction from a descriptor.

use crate::core::buffer::PixelBuffer;
use crate::core::context::OperationContext;
use crate::core::error::OperationError;
use crate::core::param::ParameterDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category for organizing operations in listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Smoothing filters
    Blur,
    /// Sharpening filters
    Sharpen,
    /// Edge detection
    Edge,
    /// Pointwise colour adjustments
    Color,
    /// Custom/user-defined
    #[default]
    Custom,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Blur => "Blur",
            Category::Sharpen => "Sharpen",
            Category::Edge => "Edge",
            Category::Color => "Color",
            Category::Custom => "Custom",
        }
    }

    /// Get all categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Blur,
            Category::Sharpen,
            Category::Edge,
            Category::Color,
            Category::Custom,
        ]
    }
}

/// Metadata describing an operation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationMetadata {
    /// Descriptor type of this operation (e.g., "blur")
    pub id: String,
    /// Human-readable name (e.g., "Box Blur")
    pub name: String,
    /// Category for listing
    pub category: Category,
    /// Detailed description
    pub description: String,
    /// Parameters read from the descriptor
    pub parameters: Vec<ParameterDefinition>,
}

impl OperationMetadata {
    /// Create a new metadata builder.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> OperationMetadataBuilder {
        OperationMetadataBuilder::new(id, name)
    }

    /// Get all parameter names.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Find a parameter by name.
    pub fn get_parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Builder for OperationMetadata.
pub struct OperationMetadataBuilder {
    id: String,
    name: String,
    category: Category,
    description: String,
    parameters: Vec<ParameterDefinition>,
}

impl OperationMetadataBuilder {
    /// Create a new builder with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: Category::Custom,
            description: String::new(),
            parameters: Vec::new(),
        }
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, param: ParameterDefinition) -> Self {
        self.parameters.push(param);
        self
    }

    /// Build the metadata.
    pub fn build(self) -> OperationMetadata {
        OperationMetadata {
            id: self.id,
            name: self.name,
            category: self.category,
            description: self.description,
            parameters: self.parameters,
        }
    }
}

/// A configured image operation.
///
/// Operators borrow their input and return a new buffer, so a failing
/// operator can never leave the caller's buffer half-written. Every output
/// must have the input's shape and rank and samples clamped into [0, 1].
///
/// # Example Implementation
///
/// ```ignore
/// #[derive(Debug)]
/// struct Invert;
///
/// impl ImageOperation for Invert {
///     fn id(&self) -> &'static str {
///         "invert"
///     }
///
///     fn apply(&self, image: &PixelBuffer) -> Result<PixelBuffer, OperationError> {
///         Ok(image.map(|v| 1.0 - v).clamp_unit())
///     }
/// }
/// ```
pub trait ImageOperation: Send + Sync + fmt::Debug {
    /// Descriptor type this operator was built from.
    fn id(&self) -> &'static str;

    /// Apply the operation to an image.
    fn apply(&self, image: &PixelBuffer) -> Result<PixelBuffer, OperationError>;
}

/// An operation the registry can build from a descriptor.
pub trait ConfigurableOperation: ImageOperation + Sized + 'static {
    /// Static description of the operation and its parameters.
    fn metadata() -> OperationMetadata;

    /// Build the operator from descriptor parameters.
    fn from_context(ctx: &OperationContext<'_>) -> Result<Self, OperationError>;
}
