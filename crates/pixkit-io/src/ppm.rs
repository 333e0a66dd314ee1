//! Netpbm PPM support.
//!
//! Reads ASCII (`P3`) and binary (`P6`) pixmaps with a maximum value up to
//! 255; samples are rescaled to the full 0..=255 range. Writes ASCII `P3`
//! with one image row per line. PPM has no alpha channel, so alpha is
//! dropped on write.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use pixkit_core::Image;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{IoError, IoResult};

/// Reads a PPM file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let bytes = fs::read(path.as_ref())?;
    decode(&bytes)
}

/// Decodes an in-memory PPM.
pub fn decode(bytes: &[u8]) -> IoResult<Image> {
    let mut header = Header { bytes, pos: 0 };
    let magic = header.token()?;
    let binary = match magic {
        b"P3" => false,
        b"P6" => true,
        other => {
            return Err(IoError::DecodeError(format!(
                "not a PPM pixmap (magic {:?})",
                String::from_utf8_lossy(other)
            )));
        }
    };
    let width = header.number("width")?;
    let height = header.number("height")?;
    let maxval = header.number("maxval")?;
    if maxval == 0 || maxval > 255 {
        return Err(IoError::UnsupportedBitDepth(format!("PPM maxval {}", maxval)));
    }
    trace!(width, height, maxval, binary, "ppm header");

    let count = width as usize * height as usize * 3;
    let raw: Vec<u32> = if binary {
        // Exactly one whitespace byte separates the header from the raster.
        let start = header.pos + 1;
        let data = bytes
            .get(start..start + count)
            .ok_or_else(|| IoError::DecodeError("truncated P6 raster".into()))?;
        data.iter().map(|&b| b as u32).collect()
    } else {
        (0..count)
            .map(|_| header.number("sample"))
            .collect::<IoResult<_>>()?
    };

    let scale = |v: u32| -> IoResult<u8> {
        if v > maxval {
            return Err(IoError::DecodeError(format!("sample {} exceeds maxval {}", v, maxval)));
        }
        Ok(((v * 255 + maxval / 2) / maxval) as u8)
    };
    let samples = raw.into_iter().map(scale).collect::<IoResult<Vec<u8>>>()?;
    Ok(Image::from_interleaved(width, height, 3, &samples)?)
}

/// Writes an image as ASCII `P3`.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let file = fs::File::create(path.as_ref())?;
    let mut w = BufWriter::new(file);
    writeln!(w, "P3")?;
    writeln!(w, "{} {}", image.width(), image.height())?;
    writeln!(w, "255")?;
    for y in 0..image.height() {
        let row: Vec<String> = (0..image.width())
            .map(|x| {
                let [r, g, b] = image.rgb(x, y);
                format!("{} {} {}", r, g, b)
            })
            .collect();
        writeln!(w, "{}", row.join(" "))?;
    }
    w.flush()?;
    Ok(())
}

/// Whitespace- and comment-aware header tokenizer.
struct Header<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Header<'a> {
    fn token(&mut self) -> IoResult<&'a [u8]> {
        loop {
            match self.bytes.get(self.pos) {
                Some(b'#') => {
                    while let Some(&c) = self.bytes.get(self.pos) {
                        if c == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(c) if c.is_ascii_whitespace() => self.pos += 1,
                Some(_) => break,
                None => return Err(IoError::DecodeError("unexpected end of PPM data".into())),
            }
        }
        let start = self.pos;
        while let Some(c) = self.bytes.get(self.pos) {
            if c.is_ascii_whitespace() || *c == b'#' {
                break;
            }
            self.pos += 1;
        }
        Ok(&self.bytes[start..self.pos])
    }

    fn number(&mut self, what: &str) -> IoResult<u32> {
        let token = self.token()?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                IoError::DecodeError(format!(
                    "bad {}: {:?}",
                    what,
                    String::from_utf8_lossy(token)
                ))
            })
    }
}
