//! Histogram command.

use std::sync::Arc;

use pixkit_core::Image;
use pixkit_ops::histogram;

use super::IN_OUT;
use crate::args::ArgumentWrapper;
use crate::cache::ArtifactCache;
use crate::error::EngineResult;
use crate::registry::{Command, CommandInfo};

pub(super) const COMMANDS: &[CommandInfo] = &[CommandInfo {
    name: "histogram",
    signature: IN_OUT,
    keywords: &[],
    summary: "per-channel intensity histogram",
    build: build_histogram,
}];

struct ComputeHistogram {
    source: Arc<Image>,
    dest: String,
}

impl Command for ComputeHistogram {
    fn run(self: Box<Self>, cache: &mut ArtifactCache) -> EngineResult<()> {
        let hist = histogram::compute(&self.source)?;
        cache.set_histogram(self.dest, hist);
        Ok(())
    }
}

fn build_histogram(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    Ok(Box::new(ComputeHistogram {
        source: cache.get_image(args.name(0)?)?,
        dest: args.name(1)?.to_string(),
    }))
}
