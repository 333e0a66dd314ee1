//! Planar 8-bit image buffer.
//!
//! [`Image`] stores one plane per channel (red, green, blue and an optional
//! alpha). Every plane holds `width * height` samples in **row-major** order:
//!
//! ```text
//! plane[Red]   = [r(0,0) r(1,0) ... r(w-1,0) r(0,1) ...]
//! plane[Green] = [g(0,0) g(1,0) ...]
//! plane[Blue]  = [b(0,0) ...]
//! plane[Alpha] = [a(0,0) ...]      // only for 4-channel images
//! ```
//!
//! Samples are `u8`, so the [0, 255] range invariant holds by construction.
//! Operations compute in floating point and write back through
//! [`clamp_u8`], which rounds and saturates instead of failing.
//!
//! # Usage
//!
//! ```rust
//! use pixkit_core::{Channel, Image};
//!
//! let mut img = Image::new(4, 2, 3).unwrap();
//! img.set_rgb(1, 0, [200, 100, 50]);
//!
//! assert_eq!(img.rgb(1, 0), [200, 100, 50]);
//! assert_eq!(img.plane(Channel::Green)[1], 100);
//! ```
//!
//! # Ownership
//!
//! Images are built mutably by an operation and then handed off by value.
//! Once an image is stored in the engine's cache it is shared behind an
//! `Arc` and never mutated again.

use crate::{Error, Result};

/// Rounds to the nearest integer and clamps into `[0, 255]`.
///
/// NaN maps to 0.
///
/// ```rust
/// use pixkit_core::clamp_u8;
///
/// assert_eq!(clamp_u8(-3.0), 0);
/// assert_eq!(clamp_u8(127.5), 128);
/// assert_eq!(clamp_u8(300.0), 255);
/// ```
#[inline]
pub fn clamp_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Image channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red plane (index 0).
    Red,
    /// Green plane (index 1).
    Green,
    /// Blue plane (index 2).
    Blue,
    /// Alpha plane (index 3, RGBA images only).
    Alpha,
}

impl Channel {
    /// The three color channels in plane order.
    pub const RGB: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Plane index of this channel.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
            Channel::Alpha => 3,
        }
    }
}

/// Owned planar image with 3 (RGB) or 4 (RGBA) channels of `u8` samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    planes: Vec<Vec<u8>>,
}

impl Image {
    /// Creates a zero-filled image.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if either side is zero, and
    /// [`Error::UnsupportedChannels`] unless `channels` is 3 or 4.
    pub fn new(width: u32, height: u32, channels: usize) -> Result<Self> {
        validate(width, height, channels)?;
        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            planes: vec![vec![0u8; len]; channels],
        })
    }

    /// Creates an image with every pixel set to `pixel`.
    ///
    /// The slice length selects the channel count.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> Result<Self> {
        validate(width, height, pixel.len())?;
        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            planes: pixel.iter().map(|&v| vec![v; len]).collect(),
        })
    }

    /// Builds an image from separate planes.
    ///
    /// # Errors
    ///
    /// Fails when a plane length is not `width * height`.
    pub fn from_planes(width: u32, height: u32, planes: Vec<Vec<u8>>) -> Result<Self> {
        validate(width, height, planes.len())?;
        let len = width as usize * height as usize;
        if let Some(bad) = planes.iter().position(|p| p.len() != len) {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!(
                    "plane {} has {} samples, expected {}",
                    bad,
                    planes[bad].len(),
                    len
                ),
            ));
        }
        Ok(Self { width, height, planes })
    }

    /// Builds an image from interleaved `RGBRGB...` or `RGBARGBA...` data.
    pub fn from_interleaved(width: u32, height: u32, channels: usize, data: &[u8]) -> Result<Self> {
        validate(width, height, channels)?;
        let len = width as usize * height as usize;
        if data.len() != len * channels {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", len * channels, data.len()),
            ));
        }
        let mut planes = vec![Vec::with_capacity(len); channels];
        for px in data.chunks_exact(channels) {
            for (plane, &v) in planes.iter_mut().zip(px) {
                plane.push(v);
            }
        }
        Ok(Self { width, height, planes })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel.
    ///
    /// Only the first `channels` entries of the returned array are used.
    pub fn from_fn<F>(width: u32, height: u32, channels: usize, f: F) -> Result<Self>
    where
        F: Fn(u32, u32) -> [u8; 4],
    {
        let mut img = Self::new(width, height, channels)?;
        for y in 0..height {
            for x in 0..width {
                let px = f(x, y);
                let idx = img.index(x, y);
                for (c, plane) in img.planes.iter_mut().enumerate() {
                    plane[idx] = px[c];
                }
            }
        }
        Ok(img)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of channels (3 or 4).
    #[inline]
    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    /// Whether an alpha plane is present.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.planes.len() == 4
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether `other` has the same width and height.
    #[inline]
    pub fn same_size(&self, other: &Image) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Plane index of pixel (x, y).
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        y as usize * self.width as usize + x as usize
    }

    /// Samples of one channel.
    ///
    /// # Panics
    ///
    /// Panics when asking for [`Channel::Alpha`] on an RGB image; check
    /// [`has_alpha`](Self::has_alpha) or use [`alpha`](Self::alpha).
    #[inline]
    pub fn plane(&self, channel: Channel) -> &[u8] {
        &self.planes[channel.index()]
    }

    /// Mutable samples of one channel.
    #[inline]
    pub fn plane_mut(&mut self, channel: Channel) -> &mut [u8] {
        &mut self.planes[channel.index()]
    }

    /// Alpha plane, if any.
    #[inline]
    pub fn alpha(&self) -> Option<&[u8]> {
        self.planes.get(Channel::Alpha.index()).map(Vec::as_slice)
    }

    /// All planes in channel order.
    #[inline]
    pub fn planes(&self) -> &[Vec<u8>] {
        &self.planes
    }

    /// Consumes the image and returns its planes.
    pub fn into_planes(self) -> Vec<Vec<u8>> {
        self.planes
    }

    /// Sample of one channel at (x, y).
    #[inline]
    pub fn sample(&self, channel: Channel, x: u32, y: u32) -> u8 {
        self.planes[channel.index()][self.index(x, y)]
    }

    /// RGB triple at (x, y).
    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.index(x, y);
        [self.planes[0][i], self.planes[1][i], self.planes[2][i]]
    }

    /// Full pixel at (x, y); alpha reads as 255 on RGB images.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        let a = self.alpha().map_or(255, |a| a[i]);
        [self.planes[0][i], self.planes[1][i], self.planes[2][i], a]
    }

    /// Checked variant of [`pixel`](Self::pixel).
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.pixel(x, y))
    }

    /// Writes the RGB channels of (x, y); alpha is untouched.
    #[inline]
    pub fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.index(x, y);
        self.planes[0][i] = rgb[0];
        self.planes[1][i] = rgb[1];
        self.planes[2][i] = rgb[2];
    }

    /// Writes every channel of (x, y) from `pixel` (alpha ignored on RGB).
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        let i = self.index(x, y);
        for (c, plane) in self.planes.iter_mut().enumerate() {
            plane[i] = pixel[c];
        }
    }

    /// Interleaved copy of the pixel data (`RGB...` or `RGBA...`).
    pub fn to_interleaved(&self) -> Vec<u8> {
        let n = self.channels();
        let mut out = Vec::with_capacity(self.pixel_count() * n);
        for i in 0..self.pixel_count() {
            for plane in &self.planes {
                out.push(plane[i]);
            }
        }
        out
    }
}

fn validate(width: u32, height: u32, channels: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "width and height must be > 0",
        ));
    }
    if !(3..=4).contains(&channels) {
        return Err(Error::UnsupportedChannels(channels));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zeroed() {
        let img = Image::new(3, 2, 4).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.channels(), 4);
        assert!(img.has_alpha());
        assert!(img.planes().iter().all(|p| p.len() == 6 && p.iter().all(|&v| v == 0)));
    }

    #[test]
    fn test_rejects_bad_shape() {
        assert!(matches!(Image::new(0, 1, 3), Err(Error::InvalidDimensions { .. })));
        assert!(matches!(Image::new(1, 1, 2), Err(Error::UnsupportedChannels(2))));
        assert!(Image::from_planes(2, 2, vec![vec![0; 4], vec![0; 4], vec![0; 3]]).is_err());
        assert!(Image::from_interleaved(2, 2, 3, &[0; 11]).is_err());
    }

    #[test]
    fn test_interleaved_roundtrip() {
        let data: Vec<u8> = (0..2 * 3 * 4).map(|i| i as u8).collect();
        let img = Image::from_interleaved(2, 3, 4, &data).unwrap();
        assert_eq!(img.pixel(1, 0), [4, 5, 6, 7]);
        assert_eq!(img.to_interleaved(), data);
    }

    #[test]
    fn test_pixel_access() {
        let mut img = Image::filled(2, 2, &[1, 2, 3]).unwrap();
        img.set_rgb(1, 1, [9, 8, 7]);
        assert_eq!(img.rgb(1, 1), [9, 8, 7]);
        assert_eq!(img.pixel(0, 0), [1, 2, 3, 255]);
        assert_eq!(img.sample(Channel::Blue, 1, 1), 7);
        assert!(img.get_pixel(2, 0).is_err());
        assert!(img.alpha().is_none());
    }

    #[test]
    fn test_from_fn() {
        let img = Image::from_fn(4, 1, 3, |x, _| [x as u8 * 10, 0, 0, 0]).unwrap();
        assert_eq!(img.plane(Channel::Red), &[0, 10, 20, 30]);
    }

    #[test]
    fn test_clamp_u8() {
        assert_eq!(clamp_u8(f64::NAN), 0);
        assert_eq!(clamp_u8(254.4), 254);
        assert_eq!(clamp_u8(1e9), 255);
        assert_eq!(clamp_u8(-0.4), 0);
    }
}
