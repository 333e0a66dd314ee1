//! # pixkit-ops
//!
//! Image algorithms behind the pixkit command set.
//!
//! Every operation takes an immutable source [`Image`](pixkit_core::Image)
//! and returns a freshly allocated result; nothing mutates its inputs.
//!
//! # Modules
//!
//! - [`pointwise`] - per-pixel adjustments and split-preview windowing
//! - [`filter`] - zero-padded convolution, blur and sharpen
//! - [`wavelet`] - Haar wavelet compression
//! - [`resize`] - bilinear downscaling
//! - [`histogram`] - histogram computation and plotting
//! - [`tone`] - levels curves and color correction
//! - [`composite`] - mask-driven selection
//! - [`transform`] - flips
//! - [`channels`] - RGB split and combine
//!
//! # Common Operations
//!
//! ## Adjust
//!
//! ```rust
//! use pixkit_core::Image;
//! use pixkit_ops::pointwise::{brighten, sepia, Split};
//!
//! let src = Image::filled(8, 8, &[90, 120, 150]).unwrap();
//! let bright = brighten(&src, 30, None);
//! let preview = sepia(&bright, Some(Split::new(50).unwrap()));
//! assert_eq!(preview.rgb(7, 0), [120, 150, 180]);
//! ```
//!
//! ## Compress
//!
//! ```rust,ignore
//! use pixkit_ops::wavelet::compress;
//!
//! let coarse = compress(&image, 90)?;
//! ```
//!
//! # Features
//!
//! - `parallel` - run convolution rows on the rayon thread pool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod channels;
pub mod composite;
pub mod filter;
pub mod histogram;
pub mod pointwise;
pub mod resize;
pub mod tone;
pub mod transform;
pub mod wavelet;

pub use error::{OpsError, OpsResult};
pub use filter::Kernel;
pub use pointwise::{Component, ColorMatrix, Split};
pub use tone::LevelsCurve;
