//! Splitting an image into per-channel images and back.

use pixkit_core::{Channel, Image};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// Returns red, green and blue images.
///
/// Each keeps one color plane and zeroes the other two; alpha is copied
/// into all three.
pub fn rgb_split(src: &Image) -> [Image; 3] {
    trace!(width = src.width(), height = src.height(), "rgb_split");
    Channel::RGB.map(|keep| {
        let mut out = src.clone();
        for other in Channel::RGB.into_iter().filter(|&c| c != keep) {
            out.plane_mut(other).fill(0);
        }
        out
    })
}

/// Rebuilds an image from the matching planes of three sources.
///
/// Alpha, when present, comes from `red`.
///
/// # Errors
///
/// [`OpsError::SizeMismatch`] when the three inputs differ in size.
pub fn rgb_combine(red: &Image, green: &Image, blue: &Image) -> OpsResult<Image> {
    if !red.same_size(green) || !red.same_size(blue) {
        return Err(OpsError::SizeMismatch(format!(
            "cannot combine {}x{}, {}x{} and {}x{}",
            red.width(),
            red.height(),
            green.width(),
            green.height(),
            blue.width(),
            blue.height()
        )));
    }
    let mut out = red.clone();
    out.plane_mut(Channel::Green).copy_from_slice(green.plane(Channel::Green));
    out.plane_mut(Channel::Blue).copy_from_slice(blue.plane(Channel::Blue));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        let src = Image::filled(2, 2, &[10, 20, 30, 40]).unwrap();
        let [r, g, b] = rgb_split(&src);
        assert_eq!(r.pixel(1, 1), [10, 0, 0, 40]);
        assert_eq!(g.pixel(1, 1), [0, 20, 0, 40]);
        assert_eq!(b.pixel(1, 1), [0, 0, 30, 40]);
    }

    #[test]
    fn test_round_trip() {
        let src = Image::from_fn(5, 3, 4, |x, y| [x as u8 * 50, y as u8 * 80, 3, 250]).unwrap();
        let [r, g, b] = rgb_split(&src);
        assert_eq!(rgb_combine(&r, &g, &b).unwrap(), src);
    }

    #[test]
    fn test_combine_size_mismatch() {
        let a = Image::new(2, 2, 3).unwrap();
        let b = Image::new(2, 3, 3).unwrap();
        assert!(rgb_combine(&a, &a, &b).is_err());
    }
}
