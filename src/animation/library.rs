use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::animation::clip::AnimationClip;
use crate::errors::{Result, RigError};

/// Name-keyed owner of loaded clips.
///
/// Clips outlive any single playback session; skeletons only hold `Arc`
/// handles handed out by the library.
#[derive(Debug, Default, Clone)]
pub struct ClipLibrary {
    clips: FxHashMap<String, Arc<AnimationClip>>,
}

impl ClipLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a clip under its own name, replacing (and returning) any
    /// previous clip with that name.
    pub fn insert(&mut self, clip: AnimationClip) -> Option<Arc<AnimationClip>> {
        let name = clip.name().to_owned();
        let previous = self.clips.insert(name, Arc::new(clip));
        if let Some(old) = &previous {
            log::debug!("ClipLibrary: replaced clip '{}'", old.name());
        }
        previous
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.clips.get(name)
    }

    /// Like [`Self::get`], but returns a shared handle or a `ClipNotFound` error.
    pub fn require(&self, name: &str) -> Result<Arc<AnimationClip>> {
        self.clips
            .get(name)
            .cloned()
            .ok_or_else(|| RigError::ClipNotFound(name.to_owned()))
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<AnimationClip>> {
        self.clips.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
