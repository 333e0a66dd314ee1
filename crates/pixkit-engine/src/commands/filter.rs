//! Convolution filters and wavelet compression.

use pixkit_ops::{filter, wavelet};

use super::{Transform, INT_IN_OUT, IN_OUT, WINDOW_KEYWORDS};
use crate::args::ArgumentWrapper;
use crate::cache::ArtifactCache;
use crate::error::{EngineError, EngineResult};
use crate::registry::{Command, CommandInfo};

pub(super) const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "blur",
        signature: IN_OUT,
        keywords: WINDOW_KEYWORDS,
        summary: "5x5 binomial blur",
        build: build_blur,
    },
    CommandInfo {
        name: "sharpen",
        signature: IN_OUT,
        keywords: WINDOW_KEYWORDS,
        summary: "5x5 high-pass sharpen",
        build: build_sharpen,
    },
    CommandInfo {
        name: "compress",
        signature: INT_IN_OUT,
        keywords: &[],
        summary: "Haar wavelet compression; ratio in 1..=99",
        build: build_compress,
    },
];

fn build_blur(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    Transform::build(
        args,
        cache,
        0,
        |img, split| Ok(filter::blur(img, split)),
    )
}

fn build_sharpen(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    Transform::build(
        args,
        cache,
        0,
        |img, split| Ok(filter::sharpen(img, split)),
    )
}

fn build_compress(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    let ratio = args.integer(0)?;
    wavelet::check_ratio(ratio)?;
    Transform::build(
        args,
        cache,
        1,
        move |img, _| wavelet::compress(img, ratio).map_err(EngineError::from),
    )
}
