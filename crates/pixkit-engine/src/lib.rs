//! # pixkit-engine
//!
//! Command dispatch for pixkit.
//!
//! - [`cache`] - named store of images and histograms
//! - [`args`] - typed arguments, signatures, keyword table
//! - [`registry`] - command table, [`Command`](registry::Command) trait
//! - [`Engine`] - facade used by collaborators
//!
//! Every transform runs through the registry:
//!
//! ```text
//! name + arguments
//!   -> lookup            (UnknownCommand)
//!   -> validate          (count, per-slot type, keywords)
//!   -> build             (resolve cache names, check ranges)
//!   -> run               (compute, then store)
//! ```
//!
//! A command stores its results only after all of its computation
//! succeeded, so a failed command leaves the cache as it was.
//!
//! # Features
//!
//! - `parallel` - forwards to `pixkit-ops/parallel`

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod args;
pub mod cache;
mod commands;
mod engine;
mod error;
pub mod registry;

pub use args::{ArgumentType, ArgumentValue, ArgumentWrapper, Keyword, Signature};
pub use cache::ArtifactCache;
pub use engine::Engine;
pub use error::{ArtifactKind, EngineError, EngineResult};
pub use registry::{Command, CommandInfo, CommandRegistry};
