//! Lossy compression with a 2D Haar wavelet.
//!
//! Each RGB plane is padded to a power-of-two square, transformed with the
//! orthonormal Haar basis, thresholded and transformed back.
//!
//! # Algorithm
//!
//! 1. Pad to `N x N`, `N = next_pow2(max(width, height))`, zero filled.
//! 2. Forward transform: for `c = N, N/2, ..., 2` run the 1D transform over
//!    the first `c` samples of each of the first `c` rows, then columns.
//! 3. Gather `|coef| > BLACK_THRESHOLD` over all three planes, sort, and
//!    take the value at rank `floor(ratio / 100 * count) - 1` (clamped to 0).
//! 4. Zero every coefficient whose magnitude is at or below that value.
//! 5. Inverse transform (columns then rows, `c = 2, 4, ..., N`).
//! 6. Round, clamp and crop back to the source size.
//!
//! ```rust
//! use pixkit_core::Image;
//! use pixkit_ops::wavelet::compress;
//!
//! let src = Image::filled(5, 3, &[90, 90, 90]).unwrap();
//! let out = compress(&src, 50).unwrap();
//! assert_eq!(out.dimensions(), (5, 3));
//! ```

use std::f64::consts::FRAC_1_SQRT_2;

use pixkit_core::{clamp_u8, Channel, Image};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// Coefficients at or below this magnitude never set the threshold.
pub const BLACK_THRESHOLD: f64 = 10.0;

/// Square `f64` buffer the transform works in.
#[derive(Debug, Clone, PartialEq)]
pub struct SquarePlane {
    size: usize,
    data: Vec<f64>,
}

impl SquarePlane {
    /// Zero-padded copy of an image plane.
    pub fn from_plane(plane: &[u8], width: usize, height: usize) -> Self {
        let size = width.max(height).next_power_of_two();
        let mut data = vec![0.0f64; size * size];
        for y in 0..height {
            for x in 0..width {
                data[y * size + x] = plane[y * width + x] as f64;
            }
        }
        Self { size, data }
    }

    /// Side length `N`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Coefficients, row-major.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Rounds, clamps and crops back to `width x height`.
    pub fn to_plane(&self, width: usize, height: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                out.push(clamp_u8(self.data[y * self.size + x]));
            }
        }
        out
    }

    /// Full forward 2D transform.
    pub fn forward(&mut self) {
        let n = self.size;
        let mut scratch = vec![0.0f64; n];
        let mut c = n;
        while c > 1 {
            for row in 0..c {
                let start = row * n;
                haar_step(&mut self.data[start..start + c], &mut scratch);
            }
            for col in 0..c {
                self.column_pass(col, c, &mut scratch, haar_step);
            }
            c /= 2;
        }
    }

    /// Full inverse 2D transform.
    pub fn inverse(&mut self) {
        let n = self.size;
        let mut scratch = vec![0.0f64; n];
        let mut c = 2;
        while c <= n {
            for col in 0..c {
                self.column_pass(col, c, &mut scratch, inverse_haar_step);
            }
            for row in 0..c {
                let start = row * n;
                inverse_haar_step(&mut self.data[start..start + c], &mut scratch);
            }
            c *= 2;
        }
    }

    /// Zeroes every coefficient with `|v| <= threshold`.
    pub fn zero_below(&mut self, threshold: f64) {
        for v in &mut self.data {
            if v.abs() <= threshold {
                *v = 0.0;
            }
        }
    }

    fn column_pass(
        &mut self,
        col: usize,
        c: usize,
        scratch: &mut [f64],
        step: fn(&mut [f64], &mut [f64]),
    ) {
        let n = self.size;
        let mut column: Vec<f64> = (0..c).map(|row| self.data[row * n + col]).collect();
        step(&mut column, scratch);
        for (row, v) in column.into_iter().enumerate() {
            self.data[row * n + col] = v;
        }
    }
}

/// One level of the 1D Haar transform, in place.
///
/// `[a0, b0, a1, b1, ...]` becomes `[avg..., diff...]` with
/// `avg = (a + b) / sqrt(2)` and `diff = (a - b) / sqrt(2)`.
pub fn haar_step(values: &mut [f64], scratch: &mut [f64]) {
    let half = values.len() / 2;
    for i in 0..half {
        let a = values[2 * i];
        let b = values[2 * i + 1];
        scratch[i] = (a + b) * FRAC_1_SQRT_2;
        scratch[half + i] = (a - b) * FRAC_1_SQRT_2;
    }
    values.copy_from_slice(&scratch[..values.len()]);
}

/// Inverse of [`haar_step`].
pub fn inverse_haar_step(values: &mut [f64], scratch: &mut [f64]) {
    let half = values.len() / 2;
    for i in 0..half {
        let avg = values[i];
        let diff = values[half + i];
        scratch[2 * i] = (avg + diff) * FRAC_1_SQRT_2;
        scratch[2 * i + 1] = (avg - diff) * FRAC_1_SQRT_2;
    }
    values.copy_from_slice(&scratch[..values.len()]);
}

/// Picks the zeroing threshold for a compression ratio.
///
/// Only magnitudes above [`BLACK_THRESHOLD`] take part in the ranking. The
/// rank `floor(ratio / 100 * count) - 1` is clamped to 0. With no eligible
/// coefficients the threshold is 0, so only exact zeros are affected.
pub fn threshold_for(coefficients: &[f64], ratio: u8) -> f64 {
    let mut eligible: Vec<f64> = coefficients
        .iter()
        .map(|v| v.abs())
        .filter(|&v| v > BLACK_THRESHOLD)
        .collect();
    if eligible.is_empty() {
        return 0.0;
    }
    eligible.sort_by(f64::total_cmp);

    let rank = (ratio as usize * eligible.len() / 100).saturating_sub(1);
    eligible[rank.min(eligible.len() - 1)]
}

/// Validates a compression ratio: strictly between 0 and 100.
pub fn check_ratio(ratio: i64) -> OpsResult<u8> {
    if ratio <= 0 || ratio >= 100 {
        return Err(OpsError::InvalidParameter(format!(
            "compression ratio must be strictly between 0 and 100, got {}",
            ratio
        )));
    }
    Ok(ratio as u8)
}

/// Compresses `src` by zeroing the weakest `ratio` percent of the Haar
/// coefficients above the black threshold.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] unless `0 < ratio < 100`.
pub fn compress(src: &Image, ratio: i64) -> OpsResult<Image> {
    let ratio = check_ratio(ratio)?;
    let width = src.width() as usize;
    let height = src.height() as usize;
    trace!(width, height, ratio, "compress");

    let mut planes: Vec<SquarePlane> = Channel::RGB
        .iter()
        .map(|&c| {
            let mut p = SquarePlane::from_plane(src.plane(c), width, height);
            p.forward();
            p
        })
        .collect();

    let all: Vec<f64> = planes.iter().flat_map(|p| p.data().iter().copied()).collect();
    let threshold = threshold_for(&all, ratio);
    debug!(threshold, coefficients = all.len(), "wavelet threshold");

    let mut dst = src.clone();
    for (plane, channel) in planes.iter_mut().zip(Channel::RGB) {
        plane.zero_below(threshold);
        plane.inverse();
        dst.plane_mut(channel)
            .copy_from_slice(&plane.to_plane(width, height));
    }
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn noise(width: u32, height: u32) -> Image {
        // Deterministic LCG texture.
        let mut state = 0x2545_f491u32;
        let mut next = move || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        let data: Vec<u8> = (0..width * height * 3).map(|_| next()).collect();
        Image::from_interleaved(width, height, 3, &data).unwrap()
    }

    fn changed_pixels(a: &Image, b: &Image) -> usize {
        let mut n = 0;
        for y in 0..a.height() {
            for x in 0..a.width() {
                if a.rgb(x, y) != b.rgb(x, y) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_haar_step_roundtrip() {
        let mut v = [4.0, 2.0, 5.0, 5.0];
        let mut scratch = [0.0; 4];
        haar_step(&mut v, &mut scratch);
        assert_relative_eq!(v[0], 6.0 * FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(v[2], 2.0 * FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(v[3], 0.0, epsilon = 1e-12);
        inverse_haar_step(&mut v, &mut scratch);
        assert_relative_eq!(v[0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(v[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(v[3], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_padding_to_power_of_two() {
        let p = SquarePlane::from_plane(&[1; 15], 5, 3);
        assert_eq!(p.size(), 8);
        assert_eq!(p.data()[4], 1.0);
        assert_eq!(p.data()[5], 0.0);
        assert_eq!(p.data()[3 * 8], 0.0);
    }

    #[test]
    fn test_forward_inverse_identity() {
        let img = noise(6, 5);
        let mut p = SquarePlane::from_plane(img.plane(Channel::Red), 6, 5);
        p.forward();
        p.inverse();
        assert_eq!(p.to_plane(6, 5), img.plane(Channel::Red));
    }

    #[test]
    fn test_forward_dc_term() {
        // Orthonormal transform: DC coefficient is mean * N.
        let mut p = SquarePlane::from_plane(&[8; 16], 4, 4);
        p.forward();
        assert_relative_eq!(p.data()[0], 32.0, epsilon = 1e-9);
        assert!(p.data()[1..].iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn test_threshold_rank() {
        let coefs = [1.0, -20.0, 30.0, 40.0, -50.0, 5.0];
        // Eligible: 20, 30, 40, 50.
        assert_eq!(threshold_for(&coefs, 50), 30.0);
        assert_eq!(threshold_for(&coefs, 99), 40.0);
        // Rank -1 clamps to the smallest eligible value.
        assert_eq!(threshold_for(&coefs, 1), 20.0);
        assert_eq!(threshold_for(&[1.0, 2.0], 50), 0.0);
    }

    #[test]
    fn test_ratio_bounds() {
        let img = noise(4, 4);
        assert!(compress(&img, 0).is_err());
        assert!(compress(&img, 100).is_err());
        assert!(compress(&img, -3).is_err());
        assert!(compress(&img, 1).is_ok());
        assert!(compress(&img, 99).is_ok());
    }

    #[test]
    fn test_higher_ratio_changes_more() {
        let img = noise(16, 12);
        let light = compress(&img, 10).unwrap();
        let heavy = compress(&img, 95).unwrap();
        assert!(changed_pixels(&img, &heavy) >= changed_pixels(&img, &light));
        assert_eq!(heavy.dimensions(), (16, 12));
    }

    #[test]
    fn test_heavy_ratio_flattens() {
        let img = noise(16, 16);
        let flat = compress(&img, 99).unwrap();
        let spread = |im: &Image| {
            let p = im.plane(Channel::Green);
            let max = *p.iter().max().unwrap() as i32;
            let min = *p.iter().min().unwrap() as i32;
            max - min
        };
        assert!(spread(&flat) < spread(&img));
    }

    #[test]
    fn test_alpha_preserved() {
        let img = Image::from_fn(3, 3, 4, |x, y| [x as u8 * 50, y as u8 * 50, 0, 77]).unwrap();
        let out = compress(&img, 60).unwrap();
        assert_eq!(out.alpha(), img.alpha());
    }
}
