//! Filter module.
//!
//! Contains the sliding-window primitive, the filter registry and the
//! built-in operators.

pub mod builtin;
pub mod registry;
pub mod window;

pub use registry::{FilterRegistry, OperationFactory};
pub use window::{convolve, slide_window, window_sum, Kernel};
