//! Mirror transforms.
//!
//! - [`flip_h`] - horizontal flip (left-right mirror)
//! - [`flip_v`] - vertical flip (top-bottom mirror)
//!
//! Both flip every plane, alpha included.

use pixkit_core::{Channel, Image};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Flips image horizontally.
///
/// # Example
///
/// ```rust
/// use pixkit_core::Image;
/// use pixkit_ops::transform::flip_h;
///
/// let src = Image::from_fn(2, 1, 3, |x, _| if x == 0 { [255, 0, 0, 0] } else { [0, 255, 0, 0] }).unwrap();
/// let flipped = flip_h(&src);
/// assert_eq!(flipped.rgb(0, 0), [0, 255, 0]);
/// assert_eq!(flipped.rgb(1, 0), [255, 0, 0]);
/// ```
pub fn flip_h(src: &Image) -> Image {
    let width = src.width() as usize;
    trace!(width, height = src.height(), "flip_h");
    let mut dst = src.clone();
    for channel in planes_of(src) {
        for row in dst.plane_mut(channel).chunks_mut(width) {
            row.reverse();
        }
    }
    dst
}

/// Flips image vertically.
pub fn flip_v(src: &Image) -> Image {
    let width = src.width() as usize;
    trace!(width, height = src.height(), "flip_v");
    let mut dst = src.clone();
    for channel in planes_of(src) {
        let plane = src.plane(channel);
        let out = dst.plane_mut(channel);
        for (dst_row, src_row) in out.chunks_mut(width).zip(plane.chunks(width).rev()) {
            dst_row.copy_from_slice(src_row);
        }
    }
    dst
}

fn planes_of(src: &Image) -> impl Iterator<Item = Channel> {
    let alpha = src.has_alpha().then_some(Channel::Alpha);
    Channel::RGB.into_iter().chain(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Image {
        Image::from_fn(3, 2, 4, |x, y| [x as u8, y as u8, (x + 3 * y) as u8, 10 + x as u8])
            .unwrap()
    }

    #[test]
    fn test_flip_h() {
        let src = sample();
        let out = flip_h(&src);
        assert_eq!(out.pixel(0, 0), src.pixel(2, 0));
        assert_eq!(out.pixel(2, 1), src.pixel(0, 1));
        assert_eq!(out.pixel(1, 1), src.pixel(1, 1));
    }

    #[test]
    fn test_flip_v() {
        let src = sample();
        let out = flip_v(&src);
        assert_eq!(out.pixel(0, 0), src.pixel(0, 1));
        assert_eq!(out.pixel(2, 1), src.pixel(2, 0));
    }

    #[test]
    fn test_involution() {
        let src = sample();
        assert_eq!(flip_h(&flip_h(&src)), src);
        assert_eq!(flip_v(&flip_v(&src)), src);
    }
}
