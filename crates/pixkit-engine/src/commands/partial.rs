//! `partial-process`: composite a filtered image over its source.

use std::sync::Arc;

use pixkit_core::Image;
use pixkit_ops::composite::masked_select;

use super::resolve_mask;
use crate::args::{ArgumentType, ArgumentWrapper, Keyword, Signature};
use crate::cache::ArtifactCache;
use crate::error::{EngineError, EngineResult};
use crate::registry::{Command, CommandInfo};

pub(super) const COMMANDS: &[CommandInfo] = &[CommandInfo {
    name: "partial-process",
    signature: Signature::new(&[
        ArgumentType::ImageName,
        ArgumentType::ImageName,
        ArgumentType::NewImageName,
    ]),
    keywords: &[Keyword::MaskImage],
    summary: "take the filtered image where the mask is black (maskimg required)",
    build: build_partial,
}];

struct Partial {
    current: Arc<Image>,
    filtered: Arc<Image>,
    mask: Arc<Image>,
    dest: String,
}

impl Command for Partial {
    fn run(self: Box<Self>, cache: &mut ArtifactCache) -> EngineResult<()> {
        let out = masked_select(&self.current, &self.filtered, &self.mask)?;
        cache.set_image(self.dest, out);
        Ok(())
    }
}

fn build_partial(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    let mask_name = args
        .mask()
        .ok_or(EngineError::MissingKeyword(Keyword::MaskImage.name()))?;
    let current = cache.get_image(args.name(0)?)?;
    let filtered = cache.get_image(args.name(1)?)?;
    let mask = resolve_mask(cache, mask_name, &current)?;
    Ok(Box::new(Partial {
        current,
        filtered,
        mask,
        dest: args.name(2)?.to_string(),
    }))
}
