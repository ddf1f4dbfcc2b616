//! Built-in filter implementations.
//!
//! This module contains the standard operations that ship with Retouch.

mod blur;
mod color;
mod edge;

use crate::filters::registry::FilterRegistry;

/// Register all built-in filters.
pub fn register_all(registry: &mut FilterRegistry) {
    blur::register(registry);
    edge::register(registry);
    color::register(registry);
}

// Re-export for direct access
pub use blur::{BoxBlur, Sharpen, SHARPEN_BLUR_SIZE};
pub use color::{Brightness, Contrast, Saturation, LUMA_WEIGHTS};
pub use edge::Sobel;
