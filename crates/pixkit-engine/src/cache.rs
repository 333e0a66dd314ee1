//! Named artifact cache.
//!
//! Maps a name to exactly one [`Image`] or [`Histogram`]. Artifacts are
//! stored behind [`Arc`] so commands can hold a source while the cache is
//! later borrowed mutably to store their result.

use std::collections::HashMap;
use std::sync::Arc;

use pixkit_core::{Histogram, Image};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::error::{ArtifactKind, EngineError, EngineResult};

#[derive(Debug, Clone)]
enum Artifact {
    Image(Arc<Image>),
    Histogram(Arc<Histogram>),
}

impl Artifact {
    fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::Image(_) => ArtifactKind::Image,
            Artifact::Histogram(_) => ArtifactKind::Histogram,
        }
    }
}

/// Process-lifetime store of named images and histograms.
///
/// `set_*` always overwrites, whatever kind was stored before. Reads of the
/// wrong kind fail exactly like reads of an absent name.
#[derive(Debug, Clone, Default)]
pub struct ArtifactCache {
    entries: HashMap<String, Artifact>,
}

impl ArtifactCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Image stored under `name`.
    pub fn get_image(&self, name: &str) -> EngineResult<Arc<Image>> {
        match self.entries.get(name) {
            Some(Artifact::Image(img)) => Ok(Arc::clone(img)),
            _ => Err(EngineError::not_found(name, ArtifactKind::Image)),
        }
    }

    /// Histogram stored under `name`.
    pub fn get_histogram(&self, name: &str) -> EngineResult<Arc<Histogram>> {
        match self.entries.get(name) {
            Some(Artifact::Histogram(h)) => Ok(Arc::clone(h)),
            _ => Err(EngineError::not_found(name, ArtifactKind::Histogram)),
        }
    }

    /// True when `name` holds a histogram.
    pub fn is_histogram(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Artifact::Histogram(_)))
    }

    /// Kind stored under `name`, if any.
    pub fn kind_of(&self, name: &str) -> Option<ArtifactKind> {
        self.entries.get(name).map(Artifact::kind)
    }

    /// Stores an image, replacing whatever `name` held.
    pub fn set_image(&mut self, name: impl Into<String>, image: impl Into<Arc<Image>>) {
        let name = name.into();
        let image = image.into();
        trace!(name = %name, width = image.width(), height = image.height(), "set image");
        self.entries.insert(name, Artifact::Image(image));
    }

    /// Stores a histogram, replacing whatever `name` held.
    pub fn set_histogram(&mut self, name: impl Into<String>, hist: impl Into<Arc<Histogram>>) {
        let name = name.into();
        trace!(name = %name, "set histogram");
        self.entries.insert(name, Artifact::Histogram(hist.into()));
    }

    /// True when anything is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixkit_core::BINS;

    fn histogram() -> Histogram {
        Histogram::from_counts([[0; BINS]; 3]).unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let mut cache = ArtifactCache::new();
        let img = Image::filled(2, 2, &[1, 2, 3]).unwrap();
        cache.set_image("a", img.clone());
        assert_eq!(*cache.get_image("a").unwrap(), img);
        assert!(!cache.is_histogram("a"));
        assert_eq!(cache.kind_of("a"), Some(ArtifactKind::Image));
    }

    #[test]
    fn test_wrong_kind_is_not_found() {
        let mut cache = ArtifactCache::new();
        cache.set_histogram("h", histogram());
        assert!(cache.is_histogram("h"));
        assert!(matches!(
            cache.get_image("h"),
            Err(EngineError::NotFound { kind: ArtifactKind::Image, .. })
        ));
        assert!(matches!(
            cache.get_histogram("missing"),
            Err(EngineError::NotFound { kind: ArtifactKind::Histogram, .. })
        ));
    }

    #[test]
    fn test_overwrite_changes_kind() {
        let mut cache = ArtifactCache::new();
        cache.set_histogram("x", histogram());
        cache.set_image("x", Image::new(1, 1, 3).unwrap());
        assert!(!cache.is_histogram("x"));
        assert!(cache.get_image("x").is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let mut cache = ArtifactCache::new();
        for name in ["b", "c", "a"] {
            cache.set_image(name, Image::new(1, 1, 3).unwrap());
        }
        assert_eq!(cache.names(), vec!["a", "b", "c"]);
        assert!(cache.contains("c"));
        assert!(!cache.contains("d"));
    }
}
