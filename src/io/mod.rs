//! Input/output around the pixel core.
//!
//! Configuration loading, image decode/encode, output-path handling and
//! handing results to an image viewer.
//! Nothing in `core`, `filters` or `execution` touches the file system.

pub mod config;
pub mod display;
pub mod image;
pub mod output;

pub use self::config::EditorConfig;
pub use self::display::{show_image, write_preview, ImageViewer, SystemViewer};
pub use self::image::{from_dynamic, load_image, save_image, to_dynamic};
pub use self::output::{prepare_output_path, resolve_output_path};
