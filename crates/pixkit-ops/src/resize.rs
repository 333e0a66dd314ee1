//! Image downscaling.
//!
//! Every destination pixel `(i, j)` (row, column) is mapped back onto the
//! source grid at `(i * h / th, j * w / tw)`. When both coordinates land on
//! whole pixels that pixel is copied; otherwise the four neighbours are
//! blended bilinearly, first along the column axis, then along the row axis.
//!
//! # Example
//!
//! ```rust
//! use pixkit_core::Image;
//! use pixkit_ops::resize::downscale;
//!
//! let src = Image::filled(64, 64, &[10, 20, 30, 255]).unwrap();
//! let dst = downscale(&src, 16, 32).unwrap();
//! assert_eq!(dst.dimensions(), (32, 16));
//! ```

use pixkit_core::{clamp_u8, Image};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// Checks a requested target size against the source.
///
/// Both sides must be at least 1 and no larger than the source.
pub fn check_target(src: &Image, target_height: i64, target_width: i64) -> OpsResult<(u32, u32)> {
    let (w, h) = (src.width() as i64, src.height() as i64);
    if target_height < 1 || target_width < 1 {
        return Err(OpsError::InvalidParameter(format!(
            "target size {}x{} must be at least 1x1",
            target_width, target_height
        )));
    }
    if target_height > h || target_width > w {
        return Err(OpsError::InvalidParameter(format!(
            "target size {}x{} exceeds source {}x{}",
            target_width, target_height, w, h
        )));
    }
    Ok((target_height as u32, target_width as u32))
}

/// Downscales `src` to `target_height` rows and `target_width` columns.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] when a target side is below 1 or larger
/// than the source; nothing is computed in that case.
pub fn downscale(src: &Image, target_height: i64, target_width: i64) -> OpsResult<Image> {
    let (th, tw) = check_target(src, target_height, target_width)?;
    let (w, h) = (src.width(), src.height());
    trace!(w, h, tw, th, "downscale");

    let mut dst = Image::new(tw, th, src.channels())?;
    let y_scale = h as f64 / th as f64;
    let x_scale = w as f64 / tw as f64;

    for i in 0..th {
        // Integer form of i * h / th keeps the exact-hit test free of
        // floating point noise.
        let y_exact = (i as u64 * h as u64) % th as u64 == 0;
        let sy = i as f64 * y_scale;
        for j in 0..tw {
            let x_exact = (j as u64 * w as u64) % tw as u64 == 0;
            let sx = j as f64 * x_scale;

            if y_exact && x_exact {
                let px = src.pixel(
                    (j as u64 * w as u64 / tw as u64) as u32,
                    (i as u64 * h as u64 / th as u64) as u32,
                );
                dst.set_pixel(j, i, px);
                continue;
            }

            let px = bilinear(src, sy, sx);
            dst.set_pixel(j, i, px);
        }
    }
    Ok(dst)
}

/// Bilinear sample at continuous source coordinate `(sy, sx)`.
fn bilinear(src: &Image, sy: f64, sx: f64) -> [u8; 4] {
    let max_x = src.width() - 1;
    let max_y = src.height() - 1;
    let x0 = (sx.floor() as u32).min(max_x);
    let x1 = (sx.ceil() as u32).min(max_x);
    let y0 = (sy.floor() as u32).min(max_y);
    let y1 = (sy.ceil() as u32).min(max_y);

    let mut out = [0u8; 4];
    for (c, plane) in src.planes().iter().enumerate() {
        let at = |x: u32, y: u32| plane[src.index(x, y)] as f64;

        let top = lerp(at(x0, y0), at(x1, y0), x0, x1, sx);
        let bottom = lerp(at(x0, y1), at(x1, y1), x0, x1, sx);
        let value = lerp(top, bottom, y0, y1, sy);
        out[c] = clamp_u8(value);
    }
    if !src.has_alpha() {
        out[3] = 255;
    }
    out
}

/// Linear blend between grid positions `p0` and `p1` evaluated at `t`.
#[inline]
fn lerp(a: f64, b: f64, p0: u32, p1: u32, t: f64) -> f64 {
    if p0 == p1 {
        return a;
    }
    a * (p1 as f64 - t) + b * (t - p0 as f64)
}
