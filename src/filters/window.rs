//! Sliding-window accumulation with edge replication.
//!
//! Every spatial filter is built on [`slide_window`]: the input is padded by
//! `kh / 2` rows and `kw / 2` columns on each side by repeating the nearest
//! edge sample, then for each kernel offset `(dy, dx)` the shifted view of
//! the padded buffer is weighted and added into the output.
//!
//! Offsets are visited in row-major order for every output sample, so the
//! result matches a sequential direct summation bit for bit. Sums are
//! accumulated in `f64` and rounded to `f32` once, which keeps small
//! integer-weighted kernels exact on constant input. Output rows are
//! independent and are computed in parallel. Results are not clamped.
//!
//! Complexity: O(H·W·C·kh·kw); memory: one padded copy, the output and one
//! `f64` accumulator row per worker.

use crate::core::buffer::PixelBuffer;
use crate::core::error::BufferError;
use rayon::prelude::*;

/// Immutable odd-dimensioned weight matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    height: usize,
    width: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Create a kernel from row-major weights.
    pub fn new(height: usize, width: usize, weights: Vec<f32>) -> Result<Self, BufferError> {
        check_kernel(height, width)?;
        if weights.len() != height * width {
            return Err(BufferError::LengthMismatch {
                expected: height * width,
                actual: weights.len(),
            });
        }
        Ok(Self {
            height,
            width,
            weights,
        })
    }

    /// Create a 3x3 kernel from a fixed matrix.
    pub fn from_3x3(rows: [[f32; 3]; 3]) -> Self {
        Self {
            height: 3,
            width: 3,
            weights: rows.iter().flatten().copied().collect(),
        }
    }

    /// Kernel where every weight is one.
    pub fn ones(height: usize, width: usize) -> Result<Self, BufferError> {
        Self::new(height, width, vec![1.0; height * width])
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Weight at row `dy`, column `dx`.
    #[inline]
    pub fn weight(&self, dy: usize, dx: usize) -> f32 {
        self.weights[dy * self.width + dx]
    }
}

fn check_kernel(height: usize, width: usize) -> Result<(), BufferError> {
    if height % 2 == 0 || width % 2 == 0 {
        return Err(BufferError::InvalidKernel { height, width });
    }
    Ok(())
}

/// Weighted sum of each `kh × kw` neighbourhood.
///
/// `weight(dy, dx)` gives the factor applied to the sample at offset
/// `(dy - kh / 2, dx - kw / 2)` from the output position. The output keeps
/// the shape and rank of `image`.
pub fn slide_window<F>(
    image: &PixelBuffer,
    kh: usize,
    kw: usize,
    weight: F,
) -> Result<PixelBuffer, BufferError>
where
    F: Fn(usize, usize) -> f32 + Sync,
{
    check_kernel(kh, kw)?;

    let (h, w, c) = image.dims();
    let (pad_y, pad_x) = (kh / 2, kw / 2);
    let padded = pad_edges(image, pad_y, pad_x)
        .ok_or(BufferError::KernelTooLarge { height: kh, width: kw })?;
    let padded_row_len = (w + 2 * pad_x) * c;
    let row_len = w * c;

    let mut out = vec![0.0f32; h * row_len];
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, out_row)| {
            let mut acc = vec![0.0f64; row_len];
            for dy in 0..kh {
                let start = (y + dy) * padded_row_len;
                let src_row = &padded[start..start + padded_row_len];
                for dx in 0..kw {
                    let k = f64::from(weight(dy, dx));
                    let shifted = &src_row[dx * c..dx * c + row_len];
                    for (a, &s) in acc.iter_mut().zip(shifted) {
                        *a += k * f64::from(s);
                    }
                }
            }
            for (o, a) in out_row.iter_mut().zip(&acc) {
                *o = *a as f32;
            }
        });

    image.with_samples(out)
}

/// Unweighted sum of each `kh × kw` neighbourhood.
pub fn window_sum(image: &PixelBuffer, kh: usize, kw: usize) -> Result<PixelBuffer, BufferError> {
    slide_window(image, kh, kw, |_, _| 1.0)
}

/// Correlate `image` with `kernel` (weights are not flipped).
pub fn convolve(image: &PixelBuffer, kernel: &Kernel) -> Result<PixelBuffer, BufferError> {
    slide_window(image, kernel.height, kernel.width, |dy, dx| {
        kernel.weight(dy, dx)
    })
}

/// Copy of `image` extended by `pad_y` rows and `pad_x` columns of
/// replicated edge samples on every side, in (H, W, C) layout.
///
/// Returns `None` when the padded size overflows or cannot be allocated.
fn pad_edges(image: &PixelBuffer, pad_y: usize, pad_x: usize) -> Option<Vec<f32>> {
    let (h, w, c) = image.dims();
    let src = image.samples();
    let padded_h = pad_y.checked_mul(2)?.checked_add(h)?;
    let padded_w = pad_x.checked_mul(2)?.checked_add(w)?;
    let len = padded_h.checked_mul(padded_w)?.checked_mul(c)?;

    let mut padded = Vec::new();
    padded.try_reserve_exact(len).ok()?;
    for py in 0..padded_h {
        let sy = py.saturating_sub(pad_y).min(h - 1);
        let row = &src[sy * w * c..(sy + 1) * w * c];
        for px in 0..padded_w {
            let sx = px.saturating_sub(pad_x).min(w - 1);
            padded.extend_from_slice(&row[sx * c..(sx + 1) * c]);
        }
    }
    Some(padded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::{Rank, Shape};
    use approx::assert_abs_diff_eq;

    fn ramp(height: usize, width: usize) -> PixelBuffer {
        let shape = Shape {
            height,
            width,
            channels: 1,
            rank: Rank::Two,
        };
        PixelBuffer::from_fn(shape, |y, x, _| (y * width + x) as f32).unwrap()
    }

    #[test]
    fn test_pad_edges_replicates_border() {
        let img = PixelBuffer::grayscale(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let padded = pad_edges(&img, 1, 1).unwrap();
        #[rustfmt::skip]
        let expected = vec![
            1.0, 1.0, 2.0, 2.0,
            1.0, 1.0, 2.0, 2.0,
            3.0, 3.0, 4.0, 4.0,
            3.0, 3.0, 4.0, 4.0,
        ];
        assert_eq!(padded, expected);
    }

    #[test]
    fn test_window_sum_at_corner_uses_replicated_samples() {
        let img = ramp(3, 3);
        let sums = window_sum(&img, 3, 3).unwrap();
        // Top-left neighbourhood: rows [0,0,1], cols [0,0,1] of the ramp.
        let expected = 0.0 + 0.0 + 1.0 + 0.0 + 0.0 + 1.0 + 3.0 + 3.0 + 4.0;
        assert_abs_diff_eq!(sums.get(0, 0, 0).unwrap(), expected);
        // Centre is a plain 3x3 sum.
        assert_abs_diff_eq!(sums.get(1, 1, 0).unwrap(), 36.0);
        assert_eq!(sums.shape(), img.shape());
    }

    #[test]
    fn test_identity_kernel() {
        let img = ramp(4, 5);
        let out = window_sum(&img, 1, 1).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_rectangular_window() {
        let img = ramp(3, 5);
        let sums = window_sum(&img, 1, 3).unwrap();
        // Row 1 is [5, 6, 7, 8, 9]; horizontal 3-tap sums with replication.
        let row: Vec<f32> = (0..5).map(|x| sums.get(1, x, 0).unwrap()).collect();
        assert_eq!(row, vec![16.0, 18.0, 21.0, 24.0, 26.0]);
    }

    #[test]
    fn test_channels_are_independent() {
        let shape = Shape {
            height: 3,
            width: 3,
            channels: 3,
            rank: Rank::Three,
        };
        let img = PixelBuffer::from_fn(shape, |_, _, c| c as f32).unwrap();
        let sums = window_sum(&img, 3, 3).unwrap();
        for c in 0..3 {
            assert_abs_diff_eq!(sums.get(2, 2, c).unwrap(), 9.0 * c as f32);
        }
    }

    #[test]
    fn test_weighted_kernel_is_correlation() {
        let img = ramp(3, 3);
        let kernel = Kernel::from_3x3([[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]]);
        let out = convolve(&img, &kernel).unwrap();
        // Picks the right-hand neighbour, replicated at the last column.
        assert_abs_diff_eq!(out.get(1, 0, 0).unwrap(), 4.0);
        assert_abs_diff_eq!(out.get(1, 2, 0).unwrap(), 5.0);
    }

    #[test]
    fn test_even_kernel_rejected() {
        let img = ramp(3, 3);
        assert_eq!(
            window_sum(&img, 2, 3),
            Err(BufferError::InvalidKernel { height: 2, width: 3 })
        );
        assert!(Kernel::ones(3, 0).is_err());
        assert!(Kernel::new(3, 3, vec![1.0; 8]).is_err());
    }

    #[test]
    fn test_oversized_kernel_is_an_error() {
        let img = ramp(3, 3);
        let huge = i64::MAX as usize;
        assert_eq!(
            window_sum(&img, 1, huge),
            Err(BufferError::KernelTooLarge {
                height: 1,
                width: huge,
            })
        );
        assert_eq!(
            window_sum(&img, usize::MAX, 3),
            Err(BufferError::KernelTooLarge {
                height: usize::MAX,
                width: 3,
            })
        );
    }

    #[test]
    fn test_single_pixel_image() {
        let img = PixelBuffer::filled_grayscale(1, 1, 0.25).unwrap();
        let sums = window_sum(&img, 5, 5).unwrap();
        assert_abs_diff_eq!(sums.get(0, 0, 0).unwrap(), 25.0 * 0.25);
    }
}
