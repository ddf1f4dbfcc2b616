//! Image decoding and encoding.
//!
//! Decoded images are normalised to `f32` samples in [0, 1]:
//! - grayscale without alpha becomes a two-dimensional buffer
//! - colour without alpha becomes (H, W, 3)
//! - anything with alpha becomes (H, W, 4)
//!
//! Encoding clamps, scales by 255 and truncates to `u8`. Alpha is dropped;
//! single-channel buffers are written as 8-bit grayscale.

use crate::core::buffer::PixelBuffer;
use crate::core::error::{BufferError, RetouchError, RetouchResult};
use image::{DynamicImage, GrayImage, RgbImage};
use std::path::Path;

/// Load an image file into a normalised buffer.
pub fn load_image(path: impl AsRef<Path>) -> RetouchResult<PixelBuffer> {
    let path = path.as_ref();
    let load_error = |error: String| RetouchError::Load {
        path: path.to_path_buf(),
        error,
    };

    let img = image::open(path).map_err(|e| load_error(e.to_string()))?;
    from_dynamic(&img).map_err(|e| load_error(e.to_string()))
}

/// Convert a decoded image into a normalised buffer.
pub fn from_dynamic(img: &DynamicImage) -> Result<PixelBuffer, BufferError> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let color = img.color();

    if color.has_alpha() {
        PixelBuffer::interleaved(height, width, 4, img.to_rgba32f().into_raw())
    } else if color.has_color() {
        PixelBuffer::interleaved(height, width, 3, img.to_rgb32f().into_raw())
    } else {
        PixelBuffer::grayscale(height, width, img.to_luma32f().into_raw())
    }
}

/// Quantise a sample to 8 bits.
#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

/// Convert a buffer into an 8-bit image ready for encoding.
pub fn to_dynamic(buffer: &PixelBuffer) -> Result<DynamicImage, BufferError> {
    let rgb = buffer.strip_alpha();
    let (height, width, channels) = rgb.dims();
    let data: Vec<u8> = rgb.samples().iter().map(|&v| to_u8(v)).collect();
    let actual = data.len();
    let mismatch = || BufferError::LengthMismatch {
        expected: height * width * channels,
        actual,
    };

    match channels {
        1 => GrayImage::from_raw(width as u32, height as u32, data)
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(mismatch),
        3 => RgbImage::from_raw(width as u32, height as u32, data)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(mismatch),
        other => Err(BufferError::UnsupportedChannels(other)),
    }
}

/// Encode a buffer to `path`; the format follows the file extension.
pub fn save_image(buffer: &PixelBuffer, path: impl AsRef<Path>) -> RetouchResult<()> {
    let path = path.as_ref();
    let save_error = |error: String| RetouchError::Save {
        path: path.to_path_buf(),
        error,
    };

    let img = to_dynamic(buffer).map_err(|e| save_error(e.to_string()))?;
    img.save(path).map_err(|e| save_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::Rank;
    use image::{GenericImageView, Rgba, RgbaImage};

    #[test]
    fn test_quantisation_truncates() {
        assert_eq!(to_u8(1.0), 255);
        assert_eq!(to_u8(0.999), 254);
        assert_eq!(to_u8(0.5), 127);
        assert_eq!(to_u8(-0.2), 0);
        assert_eq!(to_u8(1.7), 255);
    }

    #[test]
    fn test_to_dynamic_strips_alpha() {
        let buffer = PixelBuffer::interleaved(1, 2, 4, vec![1.0, 0.0, 0.0, 0.3, 0.0, 1.0, 0.0, 1.0])
            .unwrap();
        let img = to_dynamic(&buffer).unwrap();
        assert!(!img.color().has_alpha());
        let rgb = img.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [0, 255, 0]);
    }

    #[test]
    fn test_to_dynamic_grayscale() {
        let buffer = PixelBuffer::grayscale(2, 3, vec![0.0; 6]).unwrap();
        let img = to_dynamic(&buffer).unwrap();
        assert!(matches!(img, DynamicImage::ImageLuma8(_)));
        assert_eq!(img.dimensions(), (3, 2));
    }

    #[test]
    fn test_from_dynamic_channel_layouts() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 2, image::Luma([51])));
        let buffer = from_dynamic(&gray).unwrap();
        assert_eq!(buffer.rank(), Rank::Two);
        assert_eq!((buffer.height(), buffer.width()), (2, 4));
        assert!((buffer.samples()[0] - 0.2).abs() < 1e-6);

        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128])));
        assert_eq!(from_dynamic(&rgba).unwrap().channels(), 4);

        let rgb = DynamicImage::ImageRgb8(RgbImage::new(3, 3));
        assert_eq!(from_dynamic(&rgb).unwrap().channels(), 3);
    }

    #[test]
    fn test_save_and_reload_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        let buffer = PixelBuffer::grayscale(2, 2, vec![0.0, 0.2, 0.6, 1.0]).unwrap();

        save_image(&buffer, &path).unwrap();
        let reloaded = load_image(&path).unwrap();

        assert_eq!(reloaded.shape(), buffer.shape());
        for (a, b) in reloaded.samples().iter().zip(buffer.samples()) {
            assert!((a - b).abs() <= 1.0 / 255.0 + 1e-6);
        }
    }

    #[test]
    fn test_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, RetouchError::Load { .. }));
    }

    #[test]
    fn test_save_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = PixelBuffer::filled_grayscale(1, 1, 0.5).unwrap();
        let err = save_image(&buffer, dir.path().join("out.unknown")).unwrap_err();
        assert!(matches!(err, RetouchError::Save { .. }));
    }
}
