//! Pointwise color transforms.
//!
//! Every operation here is a pure function of one RGB triple. They all run
//! through [`map_rgb`], which owns iteration, clamping and split-preview
//! windowing, so a new adjustment is just a closure.
//!
//! # Operations
//!
//! - [`brighten`] - add a constant to every channel
//! - [`component`] - isolate or combine channels ([`Component`])
//! - [`color_matrix`] / [`sepia`] - 3×3 color matrix
//!
//! # Split preview
//!
//! With a [`Split`] of `S` percent only columns `x < floor(width * S / 100)`
//! are transformed. The destination starts as a copy of the source, so the
//! remaining columns are byte-identical to it.
//!
//! ```rust
//! use pixkit_core::Image;
//! use pixkit_ops::pointwise::{brighten, Split};
//!
//! let src = Image::filled(10, 1, &[100, 100, 100]).unwrap();
//! let half = brighten(&src, 20, Some(Split::new(50).unwrap()));
//! assert_eq!(half.rgb(4, 0), [120, 120, 120]);
//! assert_eq!(half.rgb(5, 0), [100, 100, 100]);
//! ```

use pixkit_core::{clamp_u8, Image};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// Rec. 709 luma weights.
pub const LUMA_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Split-preview percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split(u8);

impl Split {
    /// Whole image.
    pub const FULL: Split = Split(100);

    /// Validates a percentage.
    pub fn new(percent: i64) -> OpsResult<Self> {
        if !(0..=100).contains(&percent) {
            return Err(OpsError::InvalidParameter(format!(
                "split must be within 0..=100, got {}",
                percent
            )));
        }
        Ok(Self(percent as u8))
    }

    /// The percentage.
    #[inline]
    pub fn percent(self) -> u8 {
        self.0
    }

    /// Number of leading columns inside the window.
    #[inline]
    pub fn working_width(self, width: u32) -> u32 {
        (width as u64 * self.0 as u64 / 100) as u32
    }
}

/// Column count an optional split leaves active.
#[inline]
pub fn active_width(width: u32, split: Option<Split>) -> u32 {
    split.map_or(width, |s| s.working_width(width))
}

/// Applies `f` to every RGB triple inside the split window.
///
/// Outputs are rounded and clamped; alpha is carried over untouched.
pub fn map_rgb<F>(src: &Image, split: Option<Split>, f: F) -> Image
where
    F: Fn([u8; 3]) -> [f64; 3],
{
    let limit = active_width(src.width(), split);
    trace!(width = src.width(), height = src.height(), limit, "map_rgb");

    let mut dst = src.clone();
    for y in 0..src.height() {
        for x in 0..limit {
            let out = f(src.rgb(x, y));
            dst.set_rgb(x, y, [clamp_u8(out[0]), clamp_u8(out[1]), clamp_u8(out[2])]);
        }
    }
    dst
}

/// Adds `amount` to every channel (negative darkens).
pub fn brighten(src: &Image, amount: i32, split: Option<Split>) -> Image {
    let k = amount as f64;
    map_rgb(src, split, |[r, g, b]| [r as f64 + k, g as f64 + k, b as f64 + k])
}

/// Single-channel visualisations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// Keep red, zero green and blue.
    Red,
    /// Keep green, zero red and blue.
    Green,
    /// Keep blue, zero red and green.
    Blue,
    /// Greyscale from the channel maximum.
    Value,
    /// Greyscale from the channel mean.
    Intensity,
    /// Greyscale from Rec. 709 luma.
    Luma,
}

impl Component {
    /// Maps one pixel.
    #[inline]
    pub fn apply(self, [r, g, b]: [u8; 3]) -> [f64; 3] {
        let (r, g, b) = (r as f64, g as f64, b as f64);
        match self {
            Component::Red => [r, 0.0, 0.0],
            Component::Green => [0.0, g, 0.0],
            Component::Blue => [0.0, 0.0, b],
            Component::Value => {
                let v = r.max(g).max(b);
                [v, v, v]
            }
            Component::Intensity => {
                let v = ((r + g + b) / 3.0).round();
                [v, v, v]
            }
            Component::Luma => {
                let v = (LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b).round();
                [v, v, v]
            }
        }
    }
}

/// Produces the given component image.
pub fn component(src: &Image, which: Component, split: Option<Split>) -> Image {
    map_rgb(src, split, |rgb| which.apply(rgb))
}

/// Row-major 3×3 matrix applied to `[r, g, b]` column vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix(pub [[f64; 3]; 3]);

impl ColorMatrix {
    /// Identity.
    pub const IDENTITY: ColorMatrix =
        ColorMatrix([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Classic sepia tone.
    pub const SEPIA: ColorMatrix = ColorMatrix([
        [0.393, 0.769, 0.189],
        [0.349, 0.686, 0.168],
        [0.272, 0.534, 0.131],
    ]);

    /// Greyscale with luma weights in every row.
    pub const LUMA: ColorMatrix = ColorMatrix([LUMA_WEIGHTS, LUMA_WEIGHTS, LUMA_WEIGHTS]);

    /// Multiplies one pixel.
    #[inline]
    pub fn apply(&self, [r, g, b]: [u8; 3]) -> [f64; 3] {
        let v = [r as f64, g as f64, b as f64];
        let m = &self.0;
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }
}

/// Applies a color matrix to every pixel.
pub fn color_matrix(src: &Image, matrix: &ColorMatrix, split: Option<Split>) -> Image {
    map_rgb(src, split, |rgb| matrix.apply(rgb))
}

/// Sepia tone.
pub fn sepia(src: &Image, split: Option<Split>) -> Image {
    color_matrix(src, &ColorMatrix::SEPIA, split)
}

/// Adds a per-channel offset.
pub fn offset(src: &Image, delta: [i32; 3], split: Option<Split>) -> Image {
    map_rgb(src, split, |[r, g, b]| {
        [
            r as f64 + delta[0] as f64,
            g as f64 + delta[1] as f64,
            b as f64 + delta[2] as f64,
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> Image {
        Image::from_fn(8, 3, 4, |x, y| [x as u8 * 30, y as u8 * 60, 200, 128]).unwrap()
    }

    #[test]
    fn test_split_validation() {
        assert!(Split::new(-1).is_err());
        assert!(Split::new(101).is_err());
        assert_eq!(Split::new(50).unwrap().working_width(7), 3);
        assert_eq!(Split::FULL.working_width(7), 7);
    }

    #[test]
    fn test_brighten_identity_and_clamp() {
        let src = gradient();
        assert_eq!(brighten(&src, 0, None), src);

        let bright = brighten(&src, 100, None);
        assert_eq!(bright.rgb(7, 2), [255, 220, 255]);
        // Alpha untouched.
        assert_eq!(bright.alpha(), src.alpha());

        let dark = brighten(&src, -255, None);
        assert!(dark.rgb(3, 1).iter().all(|&v| v == 0));
    }

    #[test]
    fn test_split_full_equals_none() {
        let src = gradient();
        assert_eq!(
            sepia(&src, Some(Split::FULL)),
            sepia(&src, None)
        );
    }

    #[test]
    fn test_split_zero_is_identity() {
        let src = gradient();
        let out = component(&src, Component::Luma, Some(Split::new(0).unwrap()));
        assert_eq!(out, src);
    }

    #[test]
    fn test_components() {
        let px = [10, 200, 31];
        assert_eq!(Component::Red.apply(px), [10.0, 0.0, 0.0]);
        assert_eq!(Component::Blue.apply(px), [0.0, 0.0, 31.0]);
        assert_eq!(Component::Value.apply(px), [200.0; 3]);
        assert_eq!(Component::Intensity.apply(px), [80.0; 3]);
        // 0.2126*10 + 0.7152*200 + 0.0722*31 = 147.4862
        assert_eq!(Component::Luma.apply(px), [147.0; 3]);
    }

    #[test]
    fn test_sepia_white() {
        let white = Image::filled(1, 1, &[255, 255, 255]).unwrap();
        assert_eq!(sepia(&white, None).rgb(0, 0), [255, 255, 239]);
    }

    #[test]
    fn test_identity_matrix() {
        let src = gradient();
        assert_eq!(color_matrix(&src, &ColorMatrix::IDENTITY, None), src);
    }

    #[test]
    fn test_offset() {
        let src = Image::filled(2, 2, &[100, 100, 100]).unwrap();
        assert_eq!(offset(&src, [5, -5, 0], None).rgb(1, 1), [105, 95, 100]);
    }
}
