//! Sources of layer pixels.
//!
//! Playback itself lives behind [`crate::MediaBackend`]; the renderer only needs the current frame
//! for a layer, which a [`FrameProvider`] supplies.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::load_image;
use crate::render::frame::Frame;
use crate::scene::layer::Layer;

/// Supplies the current frame of a layer's source.
pub trait FrameProvider {
    /// Frame to draw for `layer` now, or `None` when nothing is available.
    fn frame(&mut self, layer: &Layer) -> Option<Arc<Frame>>;
}

/// Provider that never has a frame; layers render as nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFrames;

impl FrameProvider for NoFrames {
    fn frame(&mut self, _layer: &Layer) -> Option<Arc<Frame>> {
        None
    }
}

/// Decodes still images from the layer source path, once per path.
///
/// Relative sources resolve against `root`. Failed decodes are remembered so a broken file is
/// reported once, not on every frame.
#[derive(Debug, Default)]
pub struct StillImageProvider {
    root: Option<PathBuf>,
    cache: HashMap<PathBuf, Option<Arc<Frame>>>,
}

impl StillImageProvider {
    /// Provider resolving relative sources against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider resolving relative sources against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            cache: HashMap::new(),
        }
    }

    /// Insert a frame for `path` directly, bypassing the filesystem.
    pub fn insert(&mut self, path: impl Into<PathBuf>, frame: Frame) {
        self.cache.insert(path.into(), Some(Arc::new(frame)));
    }

    /// Drop every cached frame.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    fn resolve(&self, source: &Path) -> PathBuf {
        match &self.root {
            Some(root) if source.is_relative() => root.join(source),
            _ => source.to_path_buf(),
        }
    }
}

impl FrameProvider for StillImageProvider {
    fn frame(&mut self, layer: &Layer) -> Option<Arc<Frame>> {
        let source = layer.source()?;
        if let Some(hit) = self.cache.get(source) {
            return hit.clone();
        }
        let path = self.resolve(source);
        let loaded = match load_image(&path) {
            Ok(frame) => Some(Arc::new(frame)),
            Err(err) => {
                tracing::warn!(layer = layer.id(), path = %path.display(), %err, "layer source has no still frame");
                None
            }
        };
        self.cache.insert(source.to_path_buf(), loaded.clone());
        loaded
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/frames.rs"]
mod tests;
