//! `load` and `save`: the bridge between files and the image store.

use std::path::PathBuf;
use std::sync::Arc;

use pixkit_core::{Histogram, Image};
use pixkit_engine::{
    ArgumentType, ArgumentWrapper, ArtifactCache, Command, CommandInfo, EngineError,
    EngineResult, Signature,
};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "load",
        signature: Signature::new(&[ArgumentType::FileIn, ArgumentType::NewImageName]),
        keywords: &[],
        summary: "read a PNG or PPM file into the store",
        build: build_load,
    },
    CommandInfo {
        name: "save",
        signature: Signature::new(&[ArgumentType::ImageName, ArgumentType::FileOut]),
        keywords: &[],
        summary: "write an image (or a histogram plot) to a PNG or PPM file",
        build: build_save,
    },
];

fn codec_error(err: pixkit_io::IoError) -> EngineError {
    EngineError::Codec(err.to_string())
}

struct Load {
    path: PathBuf,
    dest: String,
}

impl Command for Load {
    fn run(self: Box<Self>, cache: &mut ArtifactCache) -> EngineResult<()> {
        let image = pixkit_io::read(&self.path).map_err(codec_error)?;
        info!(path = %self.path.display(), name = %self.dest, "loaded");
        cache.set_image(self.dest, image);
        Ok(())
    }
}

fn build_load(args: &ArgumentWrapper, _cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    Ok(Box::new(Load {
        path: args.path(0)?.to_path_buf(),
        dest: args.name(1)?.to_string(),
    }))
}

enum Artifact {
    Image(Arc<Image>),
    Histogram(Arc<Histogram>),
}

struct Save {
    artifact: Artifact,
    path: PathBuf,
}

impl Command for Save {
    fn run(self: Box<Self>, _cache: &mut ArtifactCache) -> EngineResult<()> {
        match &self.artifact {
            Artifact::Image(image) => pixkit_io::write(&self.path, image),
            Artifact::Histogram(hist) => pixkit_io::write_histogram(&self.path, hist),
        }
        .map_err(codec_error)?;
        info!(path = %self.path.display(), "saved");
        Ok(())
    }
}

fn build_save(args: &ArgumentWrapper, cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
    let name = args.name(0)?;
    let artifact = if cache.is_histogram(name) {
        Artifact::Histogram(cache.get_histogram(name)?)
    } else {
        Artifact::Image(cache.get_image(name)?)
    };
    Ok(Box::new(Save {
        artifact,
        path: args.path(1)?.to_path_buf(),
    }))
}
