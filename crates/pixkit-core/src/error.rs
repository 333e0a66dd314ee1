//! Error types for pixkit-core.
//!
//! Construction of [`crate::Image`] and [`crate::Histogram`] values is the
//! only fallible operation in this crate. Everything downstream
//! (`pixkit-ops`, `pixkit-engine`, `pixkit-io`) converts these errors into
//! its own enum at the crate boundary.
//!
//! # Usage
//!
//! ```rust
//! use pixkit_core::{Error, Image};
//!
//! let err = Image::new(0, 10, 3).unwrap_err();
//! assert!(matches!(err, Error::InvalidDimensions { .. }));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building image buffers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Width or height is zero, or a buffer length disagrees with them.
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// What was wrong.
        reason: String,
    },

    /// Channel count outside the supported RGB / RGBA set.
    #[error("unsupported channel count {0} (expected 3 or 4)")]
    UnsupportedChannels(usize),

    /// Pixel coordinates are outside image bounds.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate.
        x: u32,
        /// Y coordinate.
        y: u32,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`].
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::invalid_dimensions(0, 4, "width must be > 0");
        assert_eq!(err.to_string(), "invalid dimensions 0x4: width must be > 0");

        let err = Error::OutOfBounds { x: 9, y: 1, width: 8, height: 8 };
        assert!(err.to_string().contains("(9, 1)"));
    }
}
