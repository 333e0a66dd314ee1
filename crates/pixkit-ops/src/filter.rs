//! Image filtering and convolution operations.
//!
//! Provides the zero-padded 2D convolution shared by blur and sharpen.
//!
//! # Kernels
//!
//! - [`Kernel::blur`] - 5×5 binomial low-pass (sums to 1)
//! - [`Kernel::sharpen`] - 5×5 high-pass (negative border, 1/4 ring, 1 center)
//!
//! # Edges
//!
//! Each plane is padded with zeros by the kernel radius, so border pixels
//! darken under blur instead of wrapping around or clamping to the edge.
//! Alpha is never filtered.
//!
//! # Example
//!
//! ```rust
//! use pixkit_core::Image;
//! use pixkit_ops::filter::{convolve, Kernel};
//!
//! let src = Image::filled(16, 16, &[128, 128, 128]).unwrap();
//! let blurred = convolve(&src, &Kernel::blur(), None);
//! assert_eq!(blurred.rgb(8, 8), [128, 128, 128]);
//! ```

use pixkit_core::{clamp_u8, Channel, Image};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::pointwise::{active_width, Split};
use crate::{OpsError, OpsResult};

/// Convolution kernel for image filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Kernel weights, row-major.
    pub data: Vec<f64>,
    /// Kernel width (odd).
    pub width: usize,
    /// Kernel height (odd).
    pub height: usize,
}

impl Kernel {
    /// Creates a new kernel from data.
    ///
    /// Width and height must be odd numbers.
    pub fn new(data: Vec<f64>, width: usize, height: usize) -> OpsResult<Self> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(OpsError::InvalidParameter(
                "kernel dimensions must be odd".into(),
            ));
        }
        if data.len() != width * height {
            return Err(OpsError::InvalidParameter(format!(
                "kernel data size {} doesn't match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self { data, width, height })
    }

    /// Square binomial low-pass kernel (outer product of a Pascal row).
    ///
    /// `size` is made odd. `binomial(5)` is `[1, 4, 6, 4, 1] / 16` squared.
    pub fn binomial(size: usize) -> Self {
        let size = if size % 2 == 0 { size + 1 } else { size };
        let mut row = vec![1.0f64; size];
        for i in 1..size {
            row[i] = row[i - 1] * (size - i) as f64 / i as f64;
        }
        let norm: f64 = row.iter().sum();
        for w in &mut row {
            *w /= norm;
        }

        let mut data = Vec::with_capacity(size * size);
        for wy in &row {
            for wx in &row {
                data.push(wy * wx);
            }
        }
        Self { data, width: size, height: size }
    }

    /// Blur kernel used by the `blur` command.
    ///
    /// ```rust
    /// use pixkit_ops::filter::Kernel;
    ///
    /// let k = Kernel::blur();
    /// assert_eq!(k.width, 5);
    /// assert!((k.sum() - 1.0).abs() < 1e-12);
    /// ```
    pub fn blur() -> Self {
        Self::binomial(5)
    }

    /// Sharpen kernel used by the `sharpen` command.
    pub fn sharpen() -> Self {
        const E: f64 = -0.125;
        const Q: f64 = 0.25;
        Self {
            data: vec![
                E, E, E, E, E,
                E, Q, Q, Q, E,
                E, Q, 1.0, Q, E,
                E, Q, Q, Q, E,
                E, E, E, E, E,
            ],
            width: 5,
            height: 5,
        }
    }

    /// Returns the kernel radius (half-size).
    #[inline]
    pub fn radius(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// Convolves the RGB planes of `src` with `kernel`.
///
/// Columns outside the split window keep their source values.
pub fn convolve(src: &Image, kernel: &Kernel, split: Option<Split>) -> Image {
    let width = src.width() as usize;
    let height = src.height() as usize;
    let limit = active_width(src.width(), split) as usize;
    trace!(width, height, limit, kernel_w = kernel.width, kernel_h = kernel.height, "convolve");

    let mut dst = src.clone();
    for channel in Channel::RGB {
        convolve_plane(
            src.plane(channel),
            width,
            height,
            kernel,
            limit,
            dst.plane_mut(channel),
        );
    }
    dst
}

/// Applies [`Kernel::blur`].
pub fn blur(src: &Image, split: Option<Split>) -> Image {
    convolve(src, &Kernel::blur(), split)
}

/// Applies [`Kernel::sharpen`].
pub fn sharpen(src: &Image, split: Option<Split>) -> Image {
    convolve(src, &Kernel::sharpen(), split)
}

/// Copies a plane into a zero border of `rx` columns and `ry` rows.
fn pad_plane(plane: &[u8], width: usize, height: usize, rx: usize, ry: usize) -> Vec<f64> {
    let pw = width + 2 * rx;
    let ph = height + 2 * ry;
    let mut padded = vec![0.0f64; pw * ph];
    for y in 0..height {
        let dst_row = &mut padded[(y + ry) * pw + rx..(y + ry) * pw + rx + width];
        for (d, &s) in dst_row.iter_mut().zip(&plane[y * width..(y + 1) * width]) {
            *d = s as f64;
        }
    }
    padded
}

fn convolve_plane(
    plane: &[u8],
    width: usize,
    height: usize,
    kernel: &Kernel,
    limit: usize,
    out: &mut [u8],
) {
    let (rx, ry) = kernel.radius();
    let padded = pad_plane(plane, width, height, rx, ry);
    let pw = width + 2 * rx;

    let filter_row = |y: usize, out_row: &mut [u8]| {
        for x in 0..limit {
            let mut sum = 0.0f64;
            for ky in 0..kernel.height {
                let base = (y + ky) * pw + x;
                let weights = &kernel.data[ky * kernel.width..(ky + 1) * kernel.width];
                for (kx, &w) in weights.iter().enumerate() {
                    sum += padded[base + kx] * w;
                }
            }
            out_row[x] = clamp_u8(sum);
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| filter_row(y, row));
    }

    #[cfg(not(feature = "parallel"))]
    for (y, row) in out.chunks_mut(width).enumerate().take(height) {
        filter_row(y, row);
    }
}
