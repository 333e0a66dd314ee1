//! Built-in commands.
//!
//! Most commands read one image and write one image; they share the
//! [`Transform`] runner, which resolves the source, the optional `split`
//! window and the optional `maskimg` mask, and applies an operation closure.
//! The remaining commands (channel split/combine, histogram, partial
//! compositing) have their own small command types.

use std::sync::Arc;

use pixkit_core::Image;
use pixkit_ops::composite::masked_select;
use pixkit_ops::Split;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::args::{ArgumentType, ArgumentWrapper, Keyword, Signature};
use crate::cache::ArtifactCache;
use crate::error::{EngineError, EngineResult};
use crate::registry::{Command, CommandInfo};

mod adjust;
mod channels;
mod filter;
mod geometry;
mod histogram;
mod partial;

use ArgumentType::{ImageName, Integer, NewImageName};

/// `ImageName NewImageName`
pub(crate) const IN_OUT: Signature = Signature::new(&[ImageName, NewImageName]);
/// `Integer ImageName NewImageName`
pub(crate) const INT_IN_OUT: Signature = Signature::new(&[Integer, ImageName, NewImageName]);

/// Keywords accepted by filters and adjustments.
pub(crate) const WINDOW_KEYWORDS: &[Keyword] = &[Keyword::Split, Keyword::MaskImage];

/// Every built-in command.
pub(crate) fn builtins() -> Vec<CommandInfo> {
    [
        adjust::COMMANDS,
        filter::COMMANDS,
        geometry::COMMANDS,
        channels::COMMANDS,
        histogram::COMMANDS,
        partial::COMMANDS,
    ]
    .concat()
}

/// Operation run by a [`Transform`].
type Apply = Box<dyn FnOnce(&Image, Option<Split>) -> EngineResult<Image>>;

/// One-in, one-out command with optional split window and mask.
pub(crate) struct Transform {
    source: Arc<Image>,
    dest: String,
    split: Option<Split>,
    mask: Option<Arc<Image>>,
    apply: Apply,
}

impl Transform {
    /// Resolves the source at `src_slot`, the destination at `dst_slot`
    /// and the window keywords.
    pub(crate) fn from_args<F>(
        args: &ArgumentWrapper,
        cache: &ArtifactCache,
        src_slot: usize,
        dst_slot: usize,
        apply: F,
    ) -> EngineResult<Self>
    where
        F: FnOnce(&Image, Option<Split>) -> EngineResult<Image> + 'static,
    {
        let source = cache.get_image(args.name(src_slot)?)?;
        let mask = args
            .mask()
            .map(|name| resolve_mask(cache, name, &source))
            .transpose()?;
        Ok(Self {
            source,
            dest: args.name(dst_slot)?.to_string(),
            split: args.split()?,
            mask,
            apply: Box::new(apply),
        })
    }

    /// Boxed [`from_args`](Self::from_args) for the usual
    /// `ImageName NewImageName` layout starting at `first`.
    pub(crate) fn build<F>(
        args: &ArgumentWrapper,
        cache: &ArtifactCache,
        first: usize,
        apply: F,
    ) -> EngineResult<Box<dyn Command>>
    where
        F: FnOnce(&Image, Option<Split>) -> EngineResult<Image> + 'static,
    {
        Ok(Box::new(Self::from_args(args, cache, first, first + 1, apply)?))
    }
}

impl Command for Transform {
    fn run(self: Box<Self>, cache: &mut ArtifactCache) -> EngineResult<()> {
        let Transform {
            source,
            dest,
            split,
            mask,
            apply,
        } = *self;
        let mut out = apply(&source, split)?;
        if let Some(mask) = mask {
            out = masked_select(&source, &out, &mask)?;
        }
        debug!(dest = %dest, width = out.width(), height = out.height(), "transform done");
        cache.set_image(dest, out);
        Ok(())
    }
}

/// Mask image for `source`; must match its size.
pub(crate) fn resolve_mask(
    cache: &ArtifactCache,
    name: &str,
    source: &Image,
) -> EngineResult<Arc<Image>> {
    let mask = cache.get_image(name)?;
    if !mask.same_size(source) {
        return Err(EngineError::SizeMismatch(format!(
            "mask '{}' is {}x{}, image is {}x{}",
            name,
            mask.width(),
            mask.height(),
            source.width(),
            source.height()
        )));
    }
    Ok(mask)
}
