//! # pixkit-core
//!
//! Core types for the pixkit image engine.
//!
//! - [`Image`] - planar 8-bit RGB/RGBA buffer
//! - [`Histogram`] - 3×256 per-channel frequency table
//! - [`Channel`] - plane selector
//! - [`Error`] - construction errors
//!
//! ## Crate Structure
//!
//! ```text
//! pixkit-core (this crate)
//!    ^
//!    |
//!    +-- pixkit-ops (algorithms)
//!    +-- pixkit-io (codecs)
//!    +-- pixkit-engine (cache, arguments, command registry)
//!            ^
//!            +-- pixkit-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod histogram;
pub mod image;

pub use error::{Error, Result};
pub use histogram::{Histogram, BINS};
pub use image::{clamp_u8, Channel, Image};
