use std::path::{Path, PathBuf};

use crate::foundation::core::{Affine, Rect, Size, Vec2};
use crate::foundation::error::{GrailError, GrailResult};
use crate::foundation::math::clamp_unit;
use crate::scene::media::{PlaybackState, TransportMode};

/// Smallest scale a layer accepts; lower values clamp here.
pub const MIN_SCALE: f64 = 0.001;

/// A media layer positioned relative to the composition center.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    id: u32,
    offset: Vec2,
    size: Size,
    rotation: f64,
    scale: f64,
    opacity: f64,
    volume: f64,
    source: Option<PathBuf>,
    state: PlaybackState,
    position_ms: u64,
    duration_ms: Option<u64>,
    transport: TransportMode,
}

impl Layer {
    /// Empty, stopped layer with unit scale and full opacity and volume.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            offset: Vec2::ZERO,
            size: Size::ZERO,
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
            volume: 1.0,
            source: None,
            state: PlaybackState::Stopped,
            position_ms: 0,
            duration_ms: None,
            transport: TransportMode::Stop,
        }
    }

    /// 1-based layer id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Offset from the composition center.
    pub fn position(&self) -> Vec2 {
        self.offset
    }

    /// Displayed size before rotation and scale.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Rotation in degrees, clockwise in screen space.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Uniform scale about the layer center.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Opacity in `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Volume in `[0, 1]`.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Loaded source, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Playback position in milliseconds.
    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    /// Source duration in milliseconds, once the media backend has reported it.
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    /// End-of-media behavior.
    pub fn transport(&self) -> TransportMode {
        self.transport
    }

    /// Set the displayed size. Negative components clamp to zero.
    pub fn set_size(&mut self, width: f64, height: f64) -> GrailResult<()> {
        if !width.is_finite() || !height.is_finite() {
            return Err(GrailError::validation("layer size must be finite"));
        }
        self.size = Size::new(width.max(0.0), height.max(0.0));
        Ok(())
    }

    /// Set the offset from the composition center.
    pub fn set_position(&mut self, x: f64, y: f64) -> GrailResult<()> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GrailError::validation("layer position must be finite"));
        }
        self.offset = Vec2::new(x, y);
        Ok(())
    }

    /// Set the rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f64) -> GrailResult<()> {
        if !degrees.is_finite() {
            return Err(GrailError::validation("layer rotation must be finite"));
        }
        self.rotation = degrees;
        Ok(())
    }

    /// Set the uniform scale; values at or below zero clamp to [`MIN_SCALE`].
    pub fn set_scale(&mut self, scale: f64) -> GrailResult<()> {
        if !scale.is_finite() {
            return Err(GrailError::validation("layer scale must be finite"));
        }
        self.scale = scale.max(MIN_SCALE);
        Ok(())
    }

    /// Set opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) -> GrailResult<()> {
        self.opacity = clamp_unit(opacity)
            .ok_or_else(|| GrailError::validation("layer opacity must be finite"))?;
        Ok(())
    }

    /// Set volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f64) -> GrailResult<()> {
        self.volume = clamp_unit(volume)
            .ok_or_else(|| GrailError::validation("layer volume must be finite"))?;
        Ok(())
    }

    /// Load a new source. Position rewinds and the duration is forgotten; a playing layer keeps
    /// playing the new source.
    pub fn set_source(&mut self, path: impl Into<PathBuf>) -> GrailResult<()> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(GrailError::validation("layer source path is empty"));
        }
        self.source = Some(path);
        self.position_ms = 0;
        self.duration_ms = None;
        Ok(())
    }

    /// Set the end-of-media behavior.
    pub fn set_transport(&mut self, mode: TransportMode) {
        self.transport = mode;
    }

    /// `stopped | paused -> playing`. Requires a source.
    pub fn play(&mut self) -> GrailResult<()> {
        if self.source.is_none() {
            return Err(GrailError::validation(format!(
                "layer {} has no source to play",
                self.id
            )));
        }
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// `playing -> paused`. Pausing a paused layer is a no-op; a stopped layer cannot pause.
    pub fn pause(&mut self) -> GrailResult<()> {
        match self.state {
            PlaybackState::Stopped => Err(GrailError::validation(format!(
                "layer {} is stopped and cannot pause",
                self.id
            ))),
            PlaybackState::Playing | PlaybackState::Paused => {
                self.state = PlaybackState::Paused;
                Ok(())
            }
        }
    }

    /// Any state `-> stopped`, rewinding to the start.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.position_ms = 0;
    }

    /// Move the playhead. Negative positions clamp to zero, and to the duration when known.
    pub fn seek(&mut self, position_ms: f64) -> GrailResult<u64> {
        if !position_ms.is_finite() {
            return Err(GrailError::validation("seek position must be finite"));
        }
        let mut ms = position_ms.max(0.0).round() as u64;
        if let Some(d) = self.duration_ms {
            ms = ms.min(d);
        }
        self.position_ms = ms;
        Ok(ms)
    }

    pub(crate) fn report_position(&mut self, position_ms: u64) {
        self.position_ms = match self.duration_ms {
            Some(d) => position_ms.min(d),
            None => position_ms,
        };
    }

    pub(crate) fn report_duration(&mut self, duration_ms: u64) {
        self.duration_ms = Some(duration_ms);
        self.position_ms = self.position_ms.min(duration_ms);
    }

    pub(crate) fn report_state(&mut self, state: PlaybackState) {
        if state == PlaybackState::Stopped {
            self.position_ms = 0;
        }
        self.state = state;
    }

    /// Apply the transport mode after the source ran out. Returns `true` when playback restarts.
    pub(crate) fn end_of_media(&mut self) -> bool {
        match self.transport {
            TransportMode::Stop => {
                self.stop();
                false
            }
            TransportMode::Pause => {
                self.state = PlaybackState::Paused;
                if let Some(d) = self.duration_ms {
                    self.position_ms = d;
                }
                false
            }
            TransportMode::Loop => {
                self.position_ms = 0;
                self.state == PlaybackState::Playing
            }
        }
    }

    /// Layer-local to composition transform for a `scene_width` x `scene_height` scene.
    ///
    /// The layer's own rect is `(0, 0, w, h)`. It is centered in the scene, offset by
    /// [`Layer::position`], then rotated and scaled about its center.
    pub fn transform(&self, scene_width: f64, scene_height: f64) -> Affine {
        let half = Vec2::new(self.size.width / 2.0, self.size.height / 2.0);
        let origin = Vec2::new(scene_width / 2.0, scene_height / 2.0) - half + self.offset;
        Affine::translate(origin)
            * Affine::translate(half)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale(self.scale)
            * Affine::translate(-half)
    }

    /// Local content rect.
    pub fn local_rect(&self) -> Rect {
        self.size.to_rect()
    }

    /// Axis-aligned composition-space bounds.
    pub fn bounds(&self, scene_width: f64, scene_height: f64) -> Rect {
        self.transform(scene_width, scene_height)
            .transform_rect_bbox(self.local_rect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layer.rs"]
mod tests;
