//! On-screen display of a result.
//!
//! The buffer is encoded to a PNG preview in the temp directory and handed
//! to a viewer. [`SystemViewer`] opens it with the desktop's default image
//! application; the preview file is kept so the viewer can still read it
//! after the editor returns.

use crate::core::buffer::PixelBuffer;
use crate::core::error::{RetouchError, RetouchResult};
use crate::io::image::save_image;
use std::path::{Path, PathBuf};

/// Something that can show an image file to the user.
pub trait ImageViewer: Send + Sync {
    /// Show the image at `path`.
    fn open(&self, path: &Path) -> Result<(), String>;
}

/// Opens previews with the platform's default viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemViewer;

impl ImageViewer for SystemViewer {
    fn open(&self, path: &Path) -> Result<(), String> {
        opener::open(path).map_err(|e| e.to_string())
    }
}

/// Encode `image` to a kept PNG file in the temp directory.
pub fn write_preview(image: &PixelBuffer) -> RetouchResult<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("retouch-")
        .suffix(".png")
        .tempfile()?;
    let path = file
        .into_temp_path()
        .keep()
        .map_err(|e| RetouchError::Io(e.error))?;
    save_image(image, &path)?;
    Ok(path)
}

/// Write a preview of `image` and hand it to `viewer`.
///
/// Returns the preview path on success.
pub fn show_image(image: &PixelBuffer, viewer: &dyn ImageViewer) -> RetouchResult<PathBuf> {
    let path = write_preview(image)?;
    viewer
        .open(&path)
        .map_err(|error| RetouchError::Display {
            path: path.clone(),
            error,
        })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::image::load_image;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingViewer {
        opened: Mutex<Vec<PathBuf>>,
    }

    impl ImageViewer for RecordingViewer {
        fn open(&self, path: &Path) -> Result<(), String> {
            self.opened.lock().push(path.to_path_buf());
            Ok(())
        }
    }

    struct Headless;

    impl ImageViewer for Headless {
        fn open(&self, _path: &Path) -> Result<(), String> {
            Err("no display".to_string())
        }
    }

    #[test]
    fn test_preview_handed_to_viewer() {
        let img = PixelBuffer::filled_grayscale(2, 3, 0.5).unwrap();
        let viewer = RecordingViewer::default();

        let path = show_image(&img, &viewer).unwrap();

        assert_eq!(*viewer.opened.lock(), vec![path.clone()]);
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        let shown = load_image(&path).unwrap();
        assert_eq!(shown.shape(), img.shape());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_viewer_failure_is_reported() {
        let img = PixelBuffer::filled(1, 1, 3, 0.2).unwrap();
        match show_image(&img, &Headless) {
            Err(RetouchError::Display { path, error }) => {
                assert_eq!(error, "no display");
                assert!(path.exists());
                std::fs::remove_file(path).unwrap();
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
