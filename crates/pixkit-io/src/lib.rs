//! # pixkit-io
//!
//! File codecs for pixkit images.
//!
//! | Format | Read | Write |
//! |--------|------|-------|
//! | PNG    | 8/16-bit RGB, RGBA, gray, palette | 8-bit RGB / RGBA |
//! | PPM    | `P3`, `P6` | `P3` |
//!
//! The format is chosen from the file extension, case-insensitively.
//!
//! # Example
//!
//! ```rust,ignore
//! use pixkit_io::{read, write};
//!
//! let image = read("photo.png")?;
//! write("photo.ppm", &image)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod png;
pub mod ppm;

use std::path::Path;

use pixkit_core::{Histogram, Image};
#[allow(unused_imports)]
use tracing::{debug, trace};

pub use error::{IoError, IoResult};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Portable Network Graphics.
    Png,
    /// Netpbm pixmap.
    Ppm,
}

impl Format {
    /// Format for `path`'s extension.
    pub fn from_path(path: &Path) -> IoResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(Format::Png),
            "ppm" => Ok(Format::Ppm),
            _ => Err(IoError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Reads an image, picking the codec from the extension.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let image = match Format::from_path(path)? {
        Format::Png => png::read(path)?,
        Format::Ppm => ppm::read(path)?,
    };
    debug!(path = %path.display(), width = image.width(), height = image.height(), "read image");
    Ok(image)
}

/// Writes an image, picking the codec from the extension.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let path = path.as_ref();
    match Format::from_path(path)? {
        Format::Png => png::write(path, image)?,
        Format::Ppm => ppm::write(path, image)?,
    }
    debug!(path = %path.display(), "wrote image");
    Ok(())
}

/// Renders a histogram plot and writes it like an image.
pub fn write_histogram<P: AsRef<Path>>(path: P, hist: &Histogram) -> IoResult<()> {
    let plot = pixkit_ops::histogram::render(hist)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    write(path, &plot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/b.PNG")).unwrap(), Format::Png);
        assert_eq!(Format::from_path(Path::new("x.ppm")).unwrap(), Format::Ppm);
        assert!(matches!(
            Format::from_path(Path::new("x.gif")),
            Err(IoError::UnsupportedFormat(_))
        ));
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_write_histogram() {
        let img = Image::filled(3, 3, &[10, 20, 30]).unwrap();
        let hist = pixkit_ops::histogram::compute(&img).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.png");
        write_histogram(&path, &hist).unwrap();
        let plot = read(&path).unwrap();
        assert_eq!(plot.dimensions(), (256, 256));
    }
}
