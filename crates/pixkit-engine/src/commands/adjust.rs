//! Pointwise adjustments: brighten, components, sepia, levels, color correction.

use pixkit_ops::pointwise::{self, Component};
use pixkit_ops::tone::{self, LevelsCurve};

use super::{Transform, INT_IN_OUT, IN_OUT, WINDOW_KEYWORDS};
use crate::args::{ArgumentType, ArgumentWrapper, Signature};
use crate::cache::ArtifactCache;
use crate::error::{EngineError, EngineResult};
use crate::registry::{Command, CommandInfo};

const LEVELS: Signature = Signature::new(&[
    ArgumentType::Integer,
    ArgumentType::Integer,
    ArgumentType::Integer,
    ArgumentType::ImageName,
    ArgumentType::NewImageName,
]);

pub(super) const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "brighten",
        signature: INT_IN_OUT,
        keywords: WINDOW_KEYWORDS,
        summary: "add a constant to every channel",
        build: build_brighten,
    },
    CommandInfo {
        name: "red-component",
        signature: IN_OUT,
        keywords: WINDOW_KEYWORDS,
        summary: "keep only the red channel",
        build: build_red,
    },
    CommandInfo {
        name: "green-component",
        signature: IN_OUT,
        keywords: WINDOW_KEYWORDS,
        summary: "keep only the green channel",
        build: build_green,
    },
    CommandInfo {
        name: "blue-component",
        signature: IN_OUT,
        keywords: WINDOW_KEYWORDS,
        summary: "keep only the blue channel",
        build: build_blue,
    },
    CommandInfo {
        name: "value-component",
        signature: IN_OUT,
        keywords: WINDOW_KEYWORDS,
        summary: "greyscale from the channel maximum",
        build: build_value,
    },
    CommandInfo {
        name: "intensity-component",
        signature: IN_OUT,
        keywords: WINDOW_KEYWORDS,
        summary: "greyscale from the channel mean",
        build: build_intensity,
    },
    CommandInfo {
        name: "luma-component",
        signature: IN_OUT,
        keywords: WINDOW_KEYWORDS,
        summary: "greyscale from Rec. 709 luma",
        build: build_luma,
    },
    CommandInfo {
        name: "sepia",
        signature: IN_OUT,
        keywords: WINDOW_KEYWORDS,
        summary: "sepia tone",
        build: build_sepia,
    },
    CommandInfo {
        name: "levels-adjust",
        signature: LEVELS,
        keywords: WINDOW_KEYWORDS,
        summary: "quadratic levels through black, mid and white points",
        build: build_levels,
    },
    CommandInfo {
        name: "color-correct",
        signature: IN_OUT,
        keywords: WINDOW_KEYWORDS,
        summary: "align the histogram peaks of the three channels",
        build: build_color_correct,
    },
];

fn build_brighten(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    let raw = args.integer(0)?;
    // Anything past +-255 saturates anyway.
    let amount = raw.clamp(-255, 255) as i32;
    Transform::build(
        args,
        cache,
        1,
        move |img, split| Ok(pointwise::brighten(img, amount, split)),
    )
}

fn build_component(
    args: &ArgumentWrapper,
    cache: &ArtifactCache,
    which: Component,
) -> EngineResult<Box<dyn Command>> {
    Transform::build(
        args,
        cache,
        0,
        move |img, split| Ok(pointwise::component(img, which, split)),
    )
}

fn build_red(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    build_component(args, cache, Component::Red)
}

fn build_green(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    build_component(args, cache, Component::Green)
}

fn build_blue(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    build_component(args, cache, Component::Blue)
}

fn build_value(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    build_component(args, cache, Component::Value)
}

fn build_intensity(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    build_component(args, cache, Component::Intensity)
}

fn build_luma(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    build_component(args, cache, Component::Luma)
}

fn build_sepia(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    Transform::build(
        args,
        cache,
        0,
        |img, split| Ok(pointwise::sepia(img, split)),
    )
}

fn build_levels(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    let curve = LevelsCurve::new(args.integer(0)?, args.integer(1)?, args.integer(2)?)?;
    Transform::build(
        args,
        cache,
        3,
        move |img, split| Ok(tone::levels_adjust(img, &curve, split)),
    )
}

fn build_color_correct(
    args: &ArgumentWrapper,
    cache: &ArtifactCache,
) -> EngineResult<Box<dyn Command>> {
    Transform::build(
        args,
        cache,
        0,
        |img, split| tone::color_correct(img, split).map_err(EngineError::from),
    )
}
