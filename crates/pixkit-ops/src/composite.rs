//! Mask-driven compositing.
//!
//! A filter always runs on the whole image; [`masked_select`] then picks,
//! per pixel, between the filtered result and the untouched original.
//! Black mask pixels (RGB exactly zero) select the filtered image.

use pixkit_core::Image;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// Whether a mask pixel lets the filtered image through.
#[inline]
pub fn is_selected(mask_rgb: [u8; 3]) -> bool {
    mask_rgb == [0, 0, 0]
}

/// Combines `current` and `filtered` under `mask`.
///
/// Selected pixels take every channel of `filtered`, alpha included;
/// all other pixels keep `current`.
///
/// # Errors
///
/// [`OpsError::SizeMismatch`] unless all three images share dimensions.
pub fn masked_select(current: &Image, filtered: &Image, mask: &Image) -> OpsResult<Image> {
    for (label, other) in [("filtered", filtered), ("mask", mask)] {
        if !current.same_size(other) {
            return Err(OpsError::SizeMismatch(format!(
                "{} image is {}x{}, expected {}x{}",
                label,
                other.width(),
                other.height(),
                current.width(),
                current.height()
            )));
        }
    }
    trace!(width = current.width(), height = current.height(), "masked_select");

    let mut dst = current.clone();
    let mut selected = 0usize;
    for y in 0..current.height() {
        for x in 0..current.width() {
            if is_selected(mask.rgb(x, y)) {
                dst.set_pixel(x, y, filtered.pixel(x, y));
                selected += 1;
            }
        }
    }
    debug!(selected, total = current.pixel_count(), "mask applied");
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (Image, Image) {
        let current = Image::from_fn(4, 3, 3, |x, y| [x as u8, y as u8, 1, 0]).unwrap();
        let filtered = Image::filled(4, 3, &[200, 100, 50]).unwrap();
        (current, filtered)
    }

    #[test]
    fn test_black_mask_takes_filtered() {
        let (current, filtered) = pair();
        let mask = Image::new(4, 3, 3).unwrap();
        assert_eq!(masked_select(&current, &filtered, &mask).unwrap(), filtered);
    }

    #[test]
    fn test_white_mask_keeps_current() {
        let (current, filtered) = pair();
        let mask = Image::filled(4, 3, &[255, 255, 255]).unwrap();
        assert_eq!(masked_select(&current, &filtered, &mask).unwrap(), current);
    }

    #[test]
    fn test_any_nonzero_channel_keeps_current() {
        let (current, filtered) = pair();
        let mask = Image::from_fn(4, 3, 3, |x, _| {
            if x < 2 { [0, 0, 0, 0] } else { [0, 0, 1, 0] }
        })
        .unwrap();
        let out = masked_select(&current, &filtered, &mask).unwrap();
        assert_eq!(out.rgb(1, 2), filtered.rgb(1, 2));
        assert_eq!(out.rgb(3, 2), current.rgb(3, 2));
    }

    #[test]
    fn test_size_mismatch() {
        let (current, filtered) = pair();
        let mask = Image::new(3, 3, 3).unwrap();
        assert!(matches!(
            masked_select(&current, &filtered, &mask),
            Err(OpsError::SizeMismatch(_))
        ));
    }
}
