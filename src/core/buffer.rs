//! Normalised floating-point pixel buffers.
//!
//! A [`PixelBuffer`] is a dense row-major array of `f32` samples in (H, W, C)
//! order. Grayscale images may be two-dimensional (H, W); they are stored
//! exactly like (H, W, 1) and only differ by their [`Rank`] tag, so every
//! operator can work on the three-dimensional view returned by
//! [`PixelBuffer::dims`] and hand the result back through
//! [`PixelBuffer::with_samples`], which restores the original rank.

use crate::core::error::BufferError;
use std::fmt;

/// Channel counts a buffer may carry.
pub const SUPPORTED_CHANNELS: [usize; 3] = [1, 3, 4];

/// Dimensionality of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    /// (height, width) single-channel buffer
    Two,
    /// (height, width, channels) buffer
    Three,
}

/// Shape of a buffer, as (H, W) or (H, W, C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
    pub rank: Rank,
}

impl Shape {
    /// Number of samples a buffer of this shape holds.
    pub fn len(&self) -> usize {
        self.height * self.width * self.channels
    }

    /// Whether the shape holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            Rank::Two => write!(f, "({}, {})", self.height, self.width),
            Rank::Three => write!(f, "({}, {}, {})", self.height, self.width, self.channels),
        }
    }
}

/// Image samples normalised to [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    shape: Shape,
    data: Vec<f32>,
}

impl PixelBuffer {
    /// Create a two-dimensional grayscale buffer.
    pub fn grayscale(height: usize, width: usize, data: Vec<f32>) -> Result<Self, BufferError> {
        Self::from_shape(
            Shape {
                height,
                width,
                channels: 1,
                rank: Rank::Two,
            },
            data,
        )
    }

    /// Create a three-dimensional buffer with 1, 3 or 4 interleaved channels.
    pub fn interleaved(
        height: usize,
        width: usize,
        channels: usize,
        data: Vec<f32>,
    ) -> Result<Self, BufferError> {
        Self::from_shape(
            Shape {
                height,
                width,
                channels,
                rank: Rank::Three,
            },
            data,
        )
    }

    /// Create a buffer of the given shape.
    pub fn from_shape(shape: Shape, data: Vec<f32>) -> Result<Self, BufferError> {
        if shape.height == 0 || shape.width == 0 {
            return Err(BufferError::EmptyDimension {
                height: shape.height,
                width: shape.width,
            });
        }
        if !SUPPORTED_CHANNELS.contains(&shape.channels)
            || (shape.rank == Rank::Two && shape.channels != 1)
        {
            return Err(BufferError::UnsupportedChannels(shape.channels));
        }
        if data.len() != shape.len() {
            return Err(BufferError::LengthMismatch {
                expected: shape.len(),
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Create a grayscale buffer where every sample equals `value`.
    pub fn filled_grayscale(height: usize, width: usize, value: f32) -> Result<Self, BufferError> {
        Self::grayscale(height, width, vec![value; height * width])
    }

    /// Create an interleaved buffer where every sample equals `value`.
    pub fn filled(
        height: usize,
        width: usize,
        channels: usize,
        value: f32,
    ) -> Result<Self, BufferError> {
        Self::interleaved(height, width, channels, vec![value; height * width * channels])
    }

    /// Create a buffer of the given shape from a per-sample function `(y, x, c)`.
    pub fn from_fn<F>(shape: Shape, f: F) -> Result<Self, BufferError>
    where
        F: Fn(usize, usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(shape.len());
        for y in 0..shape.height {
            for x in 0..shape.width {
                for c in 0..shape.channels {
                    data.push(f(y, x, c));
                }
            }
        }
        Self::from_shape(shape, data)
    }

    /// Shape of this buffer.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Rank of this buffer.
    pub fn rank(&self) -> Rank {
        self.shape.rank
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    pub fn width(&self) -> usize {
        self.shape.width
    }

    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    /// The (H, W, C) view shared by every operator, regardless of rank.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.shape.height, self.shape.width, self.shape.channels)
    }

    /// Rebuild a buffer with the same shape and rank as `self`.
    ///
    /// This is the single place where an operator result regains the rank
    /// of its input; `samples` must be laid out like `self`.
    pub fn with_samples(&self, samples: Vec<f32>) -> Result<Self, BufferError> {
        Self::from_shape(self.shape, samples)
    }

    /// Convert to another rank.
    ///
    /// Promotion to three dimensions always succeeds; demotion to two
    /// dimensions needs exactly one channel.
    pub fn into_rank(mut self, rank: Rank) -> Result<Self, BufferError> {
        if rank == Rank::Two && self.shape.channels != 1 {
            return Err(BufferError::NotSingleChannel {
                channels: self.shape.channels,
            });
        }
        self.shape.rank = rank;
        Ok(self)
    }

    /// Raw samples in row-major (H, W, C) order.
    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    /// Consume the buffer and return its samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.data
    }

    /// Sample at row `y`, column `x`, channel `c`.
    pub fn get(&self, y: usize, x: usize, c: usize) -> Option<f32> {
        if y >= self.shape.height || x >= self.shape.width || c >= self.shape.channels {
            return None;
        }
        self.data
            .get((y * self.shape.width + x) * self.shape.channels + c)
            .copied()
    }

    /// Apply a pointwise function to every sample.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        Self {
            shape: self.shape,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Clamp every sample into [0, 1].
    pub fn clamp_unit(mut self) -> Self {
        for v in &mut self.data {
            *v = v.clamp(0.0, 1.0);
        }
        self
    }

    /// Whether every sample lies in [0, 1].
    pub fn is_normalized(&self) -> bool {
        self.data.iter().all(|v| (0.0..=1.0).contains(v))
    }

    /// Whether the buffer carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.shape.channels == 4
    }

    /// Drop the fourth channel of an RGBA buffer; other buffers are cloned.
    pub fn strip_alpha(&self) -> Self {
        if !self.has_alpha() {
            return self.clone();
        }
        let data = self
            .data
            .chunks_exact(4)
            .flat_map(|px| px[..3].iter().copied())
            .collect();
        Self {
            shape: Shape {
                channels: 3,
                ..self.shape
            },
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_is_two_dimensional() {
        let buf = PixelBuffer::filled_grayscale(4, 5, 0.5).unwrap();
        assert_eq!(buf.rank(), Rank::Two);
        assert_eq!(buf.dims(), (4, 5, 1));
        assert_eq!(buf.shape().to_string(), "(4, 5)");
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert_eq!(
            PixelBuffer::interleaved(2, 2, 2, vec![0.0; 8]),
            Err(BufferError::UnsupportedChannels(2))
        );
        assert_eq!(
            PixelBuffer::grayscale(0, 3, vec![]),
            Err(BufferError::EmptyDimension { height: 0, width: 3 })
        );
        assert_eq!(
            PixelBuffer::interleaved(2, 2, 3, vec![0.0; 11]),
            Err(BufferError::LengthMismatch {
                expected: 12,
                actual: 11
            })
        );
    }

    #[test]
    fn test_with_samples_keeps_rank() {
        let gray = PixelBuffer::filled_grayscale(2, 2, 0.1).unwrap();
        let out = gray.with_samples(vec![0.9; 4]).unwrap();
        assert_eq!(out.shape(), gray.shape());
        assert!(gray.with_samples(vec![0.9; 3]).is_err());
    }

    #[test]
    fn test_rank_round_trip() {
        let gray = PixelBuffer::filled_grayscale(3, 3, 0.2).unwrap();
        let promoted = gray.clone().into_rank(Rank::Three).unwrap();
        assert_eq!(promoted.shape().to_string(), "(3, 3, 1)");
        assert_eq!(promoted.into_rank(Rank::Two).unwrap(), gray);

        let rgb = PixelBuffer::filled(3, 3, 3, 0.2).unwrap();
        assert_eq!(
            rgb.into_rank(Rank::Two),
            Err(BufferError::NotSingleChannel { channels: 3 })
        );
    }

    #[test]
    fn test_indexing_is_row_major() {
        let shape = Shape {
            height: 2,
            width: 3,
            channels: 3,
            rank: Rank::Three,
        };
        let buf = PixelBuffer::from_fn(shape, |y, x, c| (y * 100 + x * 10 + c) as f32).unwrap();
        assert_eq!(buf.get(1, 2, 1), Some(121.0));
        assert_eq!(buf.get(2, 0, 0), None);
        assert_eq!(buf.samples()[3], 10.0);
    }

    #[test]
    fn test_clamp_and_strip_alpha() {
        let buf = PixelBuffer::interleaved(1, 2, 4, vec![-0.5, 0.5, 1.5, 0.3, 0.1, 0.2, 0.3, 1.0])
            .unwrap()
            .clamp_unit();
        assert!(buf.is_normalized());

        let rgb = buf.strip_alpha();
        assert_eq!(rgb.channels(), 3);
        assert_eq!(rgb.samples(), &[0.0, 0.5, 1.0, 0.1, 0.2, 0.3]);
    }
}
