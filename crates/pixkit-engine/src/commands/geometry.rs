//! Flips and downscaling.

use pixkit_ops::{resize, transform};

use super::{Transform, IN_OUT};
use crate::args::{ArgumentType, ArgumentWrapper, Signature};
use crate::cache::ArtifactCache;
use crate::error::{EngineError, EngineResult};
use crate::registry::{Command, CommandInfo};

const DOWNSCALE: Signature = Signature::new(&[
    ArgumentType::Integer,
    ArgumentType::Integer,
    ArgumentType::ImageName,
    ArgumentType::NewImageName,
]);

pub(super) const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "horizontal-flip",
        signature: IN_OUT,
        keywords: &[],
        summary: "mirror left to right",
        build: build_flip_h,
    },
    CommandInfo {
        name: "vertical-flip",
        signature: IN_OUT,
        keywords: &[],
        summary: "mirror top to bottom",
        build: build_flip_v,
    },
    CommandInfo {
        name: "downscale",
        signature: DOWNSCALE,
        keywords: &[],
        summary: "bilinear downscale to height and width",
        build: build_downscale,
    },
];

fn build_flip_h(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    Transform::build(args, cache, 0, |img, _| Ok(transform::flip_h(img)))
}

fn build_flip_v(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    Transform::build(args, cache, 0, |img, _| Ok(transform::flip_v(img)))
}

fn build_downscale(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    let (height, width) = (args.integer(0)?, args.integer(1)?);
    let cmd = Transform::from_args(
        args,
        cache,
        2,
        3,
        move |img, _| resize::downscale(img, height, width).map_err(EngineError::from),
    )?;
    // Reject impossible targets before any pixel work.
    resize::check_target(&cmd.source, height, width)?;
    Ok(Box::new(cmd))
}
