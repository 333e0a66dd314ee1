//! Tone curves: levels and automatic color correction.
//!
//! # Levels
//!
//! [`LevelsCurve`] fits the quadratic through `(black, 0)`, `(mid, 128)` and
//! `(white, 255)`. `(0, 128, 255)` is the identity. When two control points
//! share an input value the quadratic is undefined and the curve falls back
//! to straight segments through the distinct points.
//!
//! The curve is sampled once into a 256-entry lookup table and applied
//! through [`map_rgb`].
//!
//! # Color correction
//!
//! [`color_correct`] aligns the per-channel histogram peaks found inside
//! [`PEAK_RANGE`] by shifting each channel towards their average.

use std::ops::Range;

use pixkit_core::{clamp_u8, Channel, Image};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::histogram;
use crate::pointwise::{map_rgb, offset, Split};
use crate::{OpsError, OpsResult};

/// Output levels the control points map to.
const TARGETS: [f64; 3] = [0.0, 128.0, 255.0];

/// Interior intensity range searched for histogram peaks.
pub const PEAK_RANGE: Range<usize> = 10..245;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    /// `y = a*x^2 + b*x + c`
    Quadratic { a: f64, b: f64, c: f64 },
    /// Straight segments; used when control points coincide.
    Piecewise,
}

/// Levels transfer curve through three ascending control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelsCurve {
    points: [u8; 3],
    shape: Shape,
}

impl LevelsCurve {
    /// Builds the curve for `black <= mid <= white`, all within `0..=255`.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] when a point is out of range or the
    /// points are not in non-decreasing order.
    pub fn new(black: i64, mid: i64, white: i64) -> OpsResult<Self> {
        for (label, v) in [("black", black), ("mid", mid), ("white", white)] {
            if !(0..=255).contains(&v) {
                return Err(OpsError::InvalidParameter(format!(
                    "{} point {} outside 0..=255",
                    label, v
                )));
            }
        }
        if !(black <= mid && mid <= white) {
            return Err(OpsError::InvalidParameter(format!(
                "levels points must ascend, got {} {} {}",
                black, mid, white
            )));
        }

        let points = [black as u8, mid as u8, white as u8];
        let shape = if black == mid || mid == white {
            Shape::Piecewise
        } else {
            let (b, m, w) = (black as f64, mid as f64, white as f64);
            // Lagrange basis expanded into monomial coefficients.
            let d0 = (b - m) * (b - w);
            let d1 = (m - b) * (m - w);
            let d2 = (w - b) * (w - m);
            let [y0, y1, y2] = TARGETS;
            let a = y0 / d0 + y1 / d1 + y2 / d2;
            let bb = -(y0 * (m + w) / d0 + y1 * (b + w) / d1 + y2 * (b + m) / d2);
            let c = y0 * m * w / d0 + y1 * b * w / d1 + y2 * b * m / d2;
            Shape::Quadratic { a, b: bb, c }
        };
        debug!(?points, ?shape, "levels curve");
        Ok(Self { points, shape })
    }

    /// The `(black, mid, white)` control points.
    pub fn points(&self) -> [u8; 3] {
        self.points
    }

    /// Evaluates the curve at `x` without clamping.
    pub fn eval(&self, x: f64) -> f64 {
        match self.shape {
            Shape::Quadratic { a, b, c } => (a * x + b) * x + c,
            Shape::Piecewise => self.eval_piecewise(x),
        }
    }

    fn eval_piecewise(&self, x: f64) -> f64 {
        let [b, m, w] = self.points.map(f64::from);
        if x < b {
            return TARGETS[0];
        }
        if x == b {
            // b == m == w collapses to a hard step.
            return if b == w {
                TARGETS[2]
            } else if b == m {
                TARGETS[1]
            } else {
                TARGETS[0]
            };
        }
        if x >= w {
            return TARGETS[2];
        }
        if x < m {
            TARGETS[0] + (x - b) / (m - b) * (TARGETS[1] - TARGETS[0])
        } else {
            TARGETS[1] + (x - m) / (w - m) * (TARGETS[2] - TARGETS[1])
        }
    }

    /// Samples the clamped curve at every 8-bit input.
    pub fn lut(&self) -> [u8; 256] {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = clamp_u8(self.eval(i as f64));
        }
        table
    }
}

/// Applies `curve` to every RGB channel.
pub fn levels_adjust(src: &Image, curve: &LevelsCurve, split: Option<Split>) -> Image {
    let lut = curve.lut();
    map_rgb(src, split, |[r, g, b]| {
        [
            lut[r as usize] as f64,
            lut[g as usize] as f64,
            lut[b as usize] as f64,
        ]
    })
}

/// Per-channel offsets that move each histogram peak onto the mean peak.
pub fn correction_offsets(src: &Image) -> OpsResult<[i32; 3]> {
    let hist = histogram::compute(src)?;
    let peaks = Channel::RGB.map(|c| hist.peak_in(c, PEAK_RANGE) as f64);
    let average = peaks.iter().sum::<f64>() / 3.0;
    let delta = peaks.map(|p| (average - p).round() as i32);
    debug!(?peaks, average, ?delta, "color correction");
    Ok(delta)
}

/// Shifts channels so their dominant interior intensities line up.
pub fn color_correct(src: &Image, split: Option<Split>) -> OpsResult<Image> {
    let delta = correction_offsets(src)?;
    Ok(offset(src, delta, split))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_curve() {
        let curve = LevelsCurve::new(0, 128, 255).unwrap();
        for x in 0..=255u32 {
            assert_relative_eq!(curve.eval(x as f64), x as f64, epsilon = 1e-9);
        }
        let lut = curve.lut();
        assert!(lut.iter().enumerate().all(|(i, &v)| v as usize == i));
    }

    #[test]
    fn test_curve_hits_control_points() {
        let curve = LevelsCurve::new(20, 100, 230).unwrap();
        assert_relative_eq!(curve.eval(20.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(curve.eval(100.0), 128.0, epsilon = 1e-9);
        assert_relative_eq!(curve.eval(230.0), 255.0, epsilon = 1e-9);
        let lut = curve.lut();
        assert_eq!(lut[0], 0);
        assert_eq!(lut[255], 255);
    }

    #[test]
    fn test_rejects_bad_points() {
        assert!(LevelsCurve::new(100, 50, 200).is_err());
        assert!(LevelsCurve::new(0, 128, 256).is_err());
        assert!(LevelsCurve::new(-1, 128, 255).is_err());
        assert!(LevelsCurve::new(0, 200, 100).is_err());
    }

    #[test]
    fn test_coincident_points() {
        let curve = LevelsCurve::new(50, 50, 200).unwrap();
        let lut = curve.lut();
        assert_eq!(lut[0], 0);
        assert_eq!(lut[50], 128);
        assert_eq!(lut[200], 255);

        let step = LevelsCurve::new(90, 90, 90).unwrap().lut();
        assert_eq!(step[89], 0);
        assert_eq!(step[90], 255);
    }

    #[test]
    fn test_levels_identity_on_image() {
        let src = Image::from_fn(16, 16, 4, |x, y| [(x * 16) as u8, (y * 16) as u8, 77, 9])
            .unwrap();
        let curve = LevelsCurve::new(0, 128, 255).unwrap();
        assert_eq!(levels_adjust(&src, &curve, None), src);
    }

    #[test]
    fn test_color_correct_aligns_peaks() {
        let src = Image::filled(4, 4, &[100, 130, 160]).unwrap();
        assert_eq!(correction_offsets(&src).unwrap(), [30, 0, -30]);
        let out = color_correct(&src, None).unwrap();
        assert_eq!(out.rgb(2, 2), [130, 130, 130]);
    }

    #[test]
    fn test_color_correct_ignores_extremes() {
        // Peaks at 0 and 255 are outside the searched range.
        let src = Image::from_fn(10, 1, 3, |x, _| {
            if x < 6 { [0, 255, 0, 0] } else { [50, 50, 50, 0] }
        })
        .unwrap();
        assert_eq!(correction_offsets(&src).unwrap(), [0, 0, 0]);
    }
}
