//! Engine facade: a registry plus the cache it runs against.
//!
//! This is the surface collaborators (CLI, codecs) use. It owns the
//! [`ArtifactCache`]; mutating calls take `&mut self`, so one engine runs
//! one command at a time.
//!
//! # Example
//!
//! ```rust
//! use pixkit_core::Image;
//! use pixkit_engine::Engine;
//!
//! let mut engine = Engine::new();
//! engine.set_image("in", Image::filled(4, 4, &[10, 20, 30]).unwrap()).unwrap();
//! engine.execute_tokens("brighten", &["5", "in", "out"]).unwrap();
//! assert_eq!(engine.get_image("out").unwrap().rgb(0, 0), [15, 25, 35]);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use pixkit_core::{Histogram, Image};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

use crate::args::{check_name, ArgumentWrapper, Signature};
use crate::cache::ArtifactCache;
use crate::error::EngineResult;
use crate::registry::{CommandInfo, CommandRegistry};

/// Command registry bound to an artifact cache.
#[derive(Debug, Default)]
pub struct Engine {
    registry: CommandRegistry,
    cache: ArtifactCache,
}

impl Engine {
    /// Engine with every built-in command and an empty cache.
    pub fn new() -> Self {
        Self::with_registry(CommandRegistry::with_builtins())
    }

    /// Engine over a custom registry.
    pub fn with_registry(registry: CommandRegistry) -> Self {
        Self {
            registry,
            cache: ArtifactCache::new(),
        }
    }

    /// Adds or replaces a command.
    pub fn register(&mut self, info: CommandInfo) -> Option<CommandInfo> {
        self.registry.register(info)
    }

    /// The command table.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The artifact cache.
    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// Runs `name` with typed arguments.
    pub fn execute(&mut self, name: &str, args: &ArgumentWrapper) -> EngineResult<()> {
        self.registry.execute(name, args, &mut self.cache)?;
        info!(command = name, "command finished");
        Ok(())
    }

    /// Runs `name` with text tokens coerced against its signature.
    pub fn execute_tokens<S: AsRef<str>>(&mut self, name: &str, tokens: &[S]) -> EngineResult<()> {
        let info = self.registry.lookup(name)?;
        let args = ArgumentWrapper::from_tokens(tokens, &info.signature)
            .map_err(|e| e.in_command(name))?;
        self.execute(name, &args)
    }

    /// Image stored under `name`.
    pub fn get_image(&self, name: &str) -> EngineResult<Arc<Image>> {
        self.cache.get_image(name)
    }

    /// Stores an image under `name`, replacing any artifact there.
    pub fn set_image(&mut self, name: &str, image: impl Into<Arc<Image>>) -> EngineResult<()> {
        check_name(name)?;
        self.cache.set_image(name, image);
        Ok(())
    }

    /// Histogram stored under `name`.
    pub fn get_histogram(&self, name: &str) -> EngineResult<Arc<Histogram>> {
        self.cache.get_histogram(name)
    }

    /// True when `name` holds a histogram.
    pub fn is_histogram(&self, name: &str) -> bool {
        self.cache.is_histogram(name)
    }

    /// Signature of every registered command.
    pub fn command_signatures(&self) -> BTreeMap<&'static str, Signature> {
        self.registry.signatures()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{ArgumentValue, Keyword};
    use crate::error::{ArtifactKind, EngineError};

    fn engine_with(name: &str, image: Image) -> Engine {
        let mut engine = Engine::new();
        engine.set_image(name, image).unwrap();
        engine
    }

    fn gradient() -> Image {
        Image::from_fn(10, 6, 3, |x, y| [(x * 25) as u8, (y * 40) as u8, 128, 0]).unwrap()
    }

    #[test]
    fn test_set_image_validates_name() {
        let mut engine = Engine::new();
        let img = Image::new(1, 1, 3).unwrap();
        assert!(matches!(
            engine.set_image("two words", img),
            Err(EngineError::InvalidName(_))
        ));
    }

    #[test]
    fn test_unknown_command() {
        let mut engine = Engine::new();
        assert_eq!(
            engine.execute_tokens("explode", &["a"]),
            Err(EngineError::UnknownCommand("explode".into()))
        );
    }

    #[test]
    fn test_missing_source_leaves_cache() {
        let mut engine = engine_with("a", gradient());
        let err = engine.execute_tokens("blur", &["nope", "b"]).unwrap_err();
        assert_eq!(
            err.root_cause(),
            &EngineError::not_found("nope", ArtifactKind::Image)
        );
        assert_eq!(engine.cache().names(), vec!["a"]);
    }

    #[test]
    fn test_typed_execute() {
        let mut engine = engine_with("a", gradient());
        let args = ArgumentWrapper::new()
            .with(ArgumentValue::ImageName("a".into()))
            .with(ArgumentValue::NewImageName("b".into()))
            .with_keyword(Keyword::Split, ArgumentValue::Integer(0));
        engine.execute("sepia", &args).unwrap();
        assert_eq!(*engine.get_image("b").unwrap(), gradient());
    }

    #[test]
    fn test_histogram_artifact() {
        let mut engine = engine_with("a", gradient());
        engine.execute_tokens("histogram", &["a", "h"]).unwrap();
        assert!(engine.is_histogram("h"));
        assert_eq!(engine.get_histogram("h").unwrap().total(pixkit_core::Channel::Red), 60);
        // Histograms cannot feed image commands.
        let err = engine.execute_tokens("blur", &["h", "x"]).unwrap_err();
        assert!(matches!(err.root_cause(), EngineError::NotFound { .. }));
    }

    #[test]
    fn test_range_errors() {
        let mut engine = engine_with("a", gradient());
        for (cmd, tokens) in [
            ("compress", vec!["0", "a", "b"]),
            ("compress", vec!["100", "a", "b"]),
            ("downscale", vec!["0", "5", "a", "b"]),
            ("downscale", vec!["7", "11", "a", "b"]),
            ("levels-adjust", vec!["200", "100", "255", "a", "b"]),
            ("brighten", vec!["5", "a", "b", "split=150"]),
        ] {
            let err = engine.execute_tokens(cmd, tokens.as_slice()).unwrap_err();
            assert!(
                matches!(err.root_cause(), EngineError::InvalidParameterRange(_)),
                "{} {:?}: {}",
                cmd,
                tokens,
                err
            );
        }
        assert!(!engine.cache().contains("b"));
    }

    #[test]
    fn test_keyword_not_accepted() {
        let mut engine = engine_with("a", gradient());
        let err = engine
            .execute_tokens("horizontal-flip", &["a", "b", "split=50"])
            .unwrap_err();
        assert_eq!(err.root_cause(), &EngineError::UnknownKeyword("split".into()));
    }

    #[test]
    fn test_partial_requires_mask() {
        let mut engine = engine_with("a", gradient());
        engine.execute_tokens("blur", &["a", "b"]).unwrap();
        let err = engine
            .execute_tokens("partial-process", &["a", "b", "c"])
            .unwrap_err();
        assert_eq!(err.root_cause(), &EngineError::MissingKeyword("maskimg"));
    }

    #[test]
    fn test_mask_keyword_on_filter() {
        let mut engine = engine_with("a", gradient());
        let mask = Image::from_fn(10, 6, 3, |x, _| {
            if x < 5 { [0, 0, 0, 0] } else { [255, 255, 255, 0] }
        })
        .unwrap();
        engine.set_image("m", mask).unwrap();
        engine.execute_tokens("brighten", &["30", "a", "b", "maskimg=m"]).unwrap();
        let out = engine.get_image("b").unwrap();
        let src = gradient();
        assert_eq!(out.rgb(0, 0), [30, 30, 158]);
        assert_eq!(out.rgb(9, 5), src.rgb(9, 5));
    }

    #[test]
    fn test_signatures() {
        let engine = Engine::new();
        let sigs = engine.command_signatures();
        assert_eq!(sigs["levels-adjust"].to_string(), "Integer Integer Integer ImageName NewImageName");
        assert_eq!(sigs["rgb-combine"].to_string(), "NewImageName ImageName ImageName ImageName");
    }
}
