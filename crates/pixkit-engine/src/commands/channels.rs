//! RGB split and combine.

use std::sync::Arc;

use pixkit_core::Image;
use pixkit_ops::channels::{rgb_combine, rgb_split};

use crate::args::{ArgumentType, ArgumentWrapper, Signature};
use crate::cache::ArtifactCache;
use crate::error::EngineResult;
use crate::registry::{Command, CommandInfo};

use ArgumentType::{ImageName, NewImageName};

pub(super) const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "rgb-split",
        signature: Signature::new(&[ImageName, NewImageName, NewImageName, NewImageName]),
        keywords: &[],
        summary: "split into red, green and blue images",
        build: build_split,
    },
    CommandInfo {
        name: "rgb-combine",
        signature: Signature::new(&[NewImageName, ImageName, ImageName, ImageName]),
        keywords: &[],
        summary: "combine red, green and blue images",
        build: build_combine,
    },
];

struct SplitChannels {
    source: Arc<Image>,
    dests: [String; 3],
}

impl Command for SplitChannels {
    fn run(self: Box<Self>, cache: &mut ArtifactCache) -> EngineResult<()> {
        let outputs = rgb_split(&self.source);
        for (dest, image) in self.dests.into_iter().zip(outputs) {
            cache.set_image(dest, image);
        }
        Ok(())
    }
}

fn build_split(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    Ok(Box::new(SplitChannels {
        source: cache.get_image(args.name(0)?)?,
        dests: [
            args.name(1)?.to_string(),
            args.name(2)?.to_string(),
            args.name(3)?.to_string(),
        ],
    }))
}

struct CombineChannels {
    dest: String,
    sources: [Arc<Image>; 3],
}

impl Command for CombineChannels {
    fn run(self: Box<Self>, cache: &mut ArtifactCache) -> EngineResult<()> {
        let [r, g, b] = &self.sources;
        let image = rgb_combine(r, g, b)?;
        cache.set_image(self.dest, image);
        Ok(())
    }
}

fn build_combine(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    Ok(Box::new(CombineChannels {
        dest: args.name(0)?.to_string(),
        sources: [
            cache.get_image(args.name(1)?)?,
            cache.get_image(args.name(2)?)?,
            cache.get_image(args.name(3)?)?,
        ],
    }))
}
