//! PNG format support.
//!
//! Reads 8-bit and 16-bit RGB, RGBA, grayscale and palette PNGs into an
//! 8-bit [`Image`]; 16-bit samples are truncated to their high byte and
//! grayscale is expanded to RGB. Writes RGB or RGBA, 8 bits per channel.
//!
//! # Example
//!
//! ```rust,ignore
//! use pixkit_io::png::{read, write};
//!
//! let image = read("input.png")?;
//! write("output.png", &image)?;
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use pixkit_core::Image;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{IoError, IoResult};

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let file = File::open(path.as_ref())?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let data = &buf[..info.buffer_size()];
    trace!(width = info.width, height = info.height, color = ?info.color_type, "png read");

    let image = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgb, png::BitDepth::Eight) => {
            Image::from_interleaved(info.width, info.height, 3, data)?
        }
        (png::ColorType::Rgba, png::BitDepth::Eight) => {
            Image::from_interleaved(info.width, info.height, 4, data)?
        }
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            let rgb: Vec<u8> = data.iter().flat_map(|&g| [g, g, g]).collect();
            Image::from_interleaved(info.width, info.height, 3, &rgb)?
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
            let rgba: Vec<u8> = data
                .chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect();
            Image::from_interleaved(info.width, info.height, 4, &rgba)?
        }
        (color_type, bit_depth) => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                color_type, bit_depth
            )));
        }
    };
    Ok(image)
}

/// Writes an image to a PNG file.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    let color_type = if image.has_alpha() {
        png::ColorType::Rgba
    } else {
        png::ColorType::Rgb
    };

    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(&image.to_interleaved())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}
