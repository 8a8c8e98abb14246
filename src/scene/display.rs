use std::path::PathBuf;

use crate::control::message::Command;
use crate::foundation::core::{Color, Rect};
use crate::foundation::error::{GrailError, GrailResult};
use crate::foundation::math::clamp_unit;
use crate::scene::layer::Layer;
use crate::scene::media::{
    MediaBackend, MediaReport, MediaRequest, PlaybackState, SceneEvent, TransportMode,
};
use crate::scene::testcard::TestCard;
use crate::scene::text::{CaseTransform, HAlign, TextOverlay, VAlign};

/// Number of media layers in a default scene.
pub const DEFAULT_LAYERS: u32 = 2;
/// Default composition width.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default composition height.
pub const DEFAULT_HEIGHT: u32 = 600;
/// Largest composition edge accepted by [`Scene::set_size`].
pub const MAX_SIZE: u32 = 16_384;
/// Longest transition accepted, in seconds.
pub const MAX_TRANSITION: f64 = 10.0;

/// The composition: background, media layers, text overlay and test card.
///
/// All geometry is expressed in the composition rectangle `(0, 0, width, height)`. Control traffic
/// should go through [`Scene::apply`]; the `clip_*` and `set_*` methods are the same surface for
/// in-process callers.
pub struct Scene {
    width: u32,
    height: u32,
    opacity: f64,
    volume: f64,
    transition: f64,
    testcard: bool,
    background: Color,
    layers: Vec<Layer>,
    text: TextOverlay,
    card: TestCard,
    media: Option<Box<dyn MediaBackend>>,
    events: Vec<SceneEvent>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("opacity", &self.opacity)
            .field("volume", &self.volume)
            .field("transition", &self.transition)
            .field("testcard", &self.testcard)
            .field("background", &self.background)
            .field("layers", &self.layers)
            .field("text", &self.text)
            .field("media", &self.media.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// 800 x 600 scene with [`DEFAULT_LAYERS`] layers.
    pub fn new() -> Self {
        Self::with_layers(DEFAULT_LAYERS)
    }

    /// 800 x 600 scene with `count` layers, ids `1..=count`.
    pub fn with_layers(count: u32) -> Self {
        let rect = Rect::new(0.0, 0.0, f64::from(DEFAULT_WIDTH), f64::from(DEFAULT_HEIGHT));
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            opacity: 1.0,
            volume: 1.0,
            transition: 0.0,
            testcard: false,
            background: Color::BLACK,
            layers: (1..=count).map(Layer::new).collect(),
            text: TextOverlay::new(rect),
            card: TestCard::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            media: None,
            events: Vec::new(),
        }
    }

    /// Attach the media backend that receives load and transport requests.
    pub fn set_media_backend(&mut self, backend: Box<dyn MediaBackend>) {
        self.media = Some(backend);
    }

    /// Composition width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Composition height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The composition rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Resize the composition. Each axis clamps to `1..=MAX_SIZE`.
    ///
    /// The text bounds and test-card descriptor follow immediately; test-card pixels are
    /// regenerated lazily by the renderer.
    pub fn set_size(&mut self, width: i64, height: i64) {
        let clamp = |v: i64| v.clamp(1, i64::from(MAX_SIZE)) as u32;
        self.width = clamp(width);
        self.height = clamp(height);
        self.text.set_bounds(self.rect());
        self.card = TestCard::new(self.width, self.height);
    }

    /// Global opacity in `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Set the global opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) -> GrailResult<()> {
        self.opacity =
            clamp_unit(opacity).ok_or_else(|| GrailError::validation("opacity must be finite"))?;
        Ok(())
    }

    /// Global volume in `[0, 1]`.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Set the global volume, clamped to `[0, 1]`. Every layer's effective volume is re-sent.
    pub fn set_volume(&mut self, volume: f64) -> GrailResult<()> {
        self.volume =
            clamp_unit(volume).ok_or_else(|| GrailError::validation("volume must be finite"))?;
        for id in 1..=self.layers.len() as u32 {
            self.send_volume(id);
        }
        Ok(())
    }

    /// Crossfade duration in seconds.
    pub fn transition(&self) -> f64 {
        self.transition
    }

    /// Set the crossfade duration, clamped to `[0, 10]` seconds.
    pub fn set_transition(&mut self, seconds: f64) -> GrailResult<()> {
        if !seconds.is_finite() {
            return Err(GrailError::validation("transition must be finite"));
        }
        self.transition = seconds.clamp(0.0, MAX_TRANSITION);
        Ok(())
    }

    /// Whether the test card hides the composition.
    pub fn testcard(&self) -> bool {
        self.testcard
    }

    /// Show or hide the test card.
    pub fn set_testcard(&mut self, show: bool) {
        self.testcard = show;
    }

    /// Test-card descriptor for the current size.
    pub fn test_card(&self) -> &TestCard {
        &self.card
    }

    /// Background fill.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Set the background fill.
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Layers in stacking order, bottom first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer by 1-based id.
    pub fn layer(&self, id: u32) -> Option<&Layer> {
        let idx = usize::try_from(id).ok()?.checked_sub(1)?;
        self.layers.get(idx)
    }

    /// Mutable layer by 1-based id. Changes made here bypass the media backend.
    pub fn layer_mut(&mut self, id: u32) -> Option<&mut Layer> {
        let idx = usize::try_from(id).ok()?.checked_sub(1)?;
        self.layers.get_mut(idx)
    }

    /// Text overlay.
    pub fn text(&self) -> &TextOverlay {
        &self.text
    }

    /// Mutable text overlay, for the fine-grained font and shadow setters.
    pub fn text_mut(&mut self) -> &mut TextOverlay {
        &mut self.text
    }

    /// Set the overlay text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text.set_text(text);
    }

    /// Set the overlay font.
    pub fn set_text_font(&mut self, size_pt: f64, family: &str, style: &str) -> GrailResult<()> {
        self.text.set_font(size_pt, family, style)
    }

    /// Set the overlay color.
    pub fn set_text_color(&mut self, color: Color) {
        self.text.set_color(color);
    }

    /// Set the overlay padding.
    pub fn set_text_padding(&mut self, l: f64, t: f64, r: f64, b: f64) -> GrailResult<()> {
        self.text.set_padding(l, t, r, b)
    }

    /// Set the overlay alignment.
    pub fn set_text_align(&mut self, h: HAlign, v: VAlign) {
        self.text.set_align(h, v);
    }

    /// Set the overlay shadow.
    pub fn set_text_shadow(&mut self, x: f64, y: f64, blur: f64, color: Color) -> GrailResult<()> {
        self.text.set_shadow(x, y, blur, color)
    }

    /// Set the overlay case transform.
    pub fn set_text_transform(&mut self, mode: CaseTransform) {
        self.text.set_transform(mode);
    }

    /// Clear the text and stop every layer.
    pub fn blackout(&mut self) {
        self.text.set_text("");
        for id in 1..=self.layers.len() as u32 {
            self.clip_stop(id);
        }
    }

    /// Drain queued inspector events.
    pub fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Set a layer's size. `false` for an unknown layer or a rejected value.
    pub fn clip_size(&mut self, id: u32, width: f64, height: f64) -> bool {
        self.with_layer(id, |l| l.set_size(width, height))
    }

    /// Set a layer's offset from the composition center.
    pub fn clip_position(&mut self, id: u32, x: f64, y: f64) -> bool {
        self.with_layer(id, |l| l.set_position(x, y))
    }

    /// Set a layer's rotation in degrees.
    pub fn clip_rotate(&mut self, id: u32, degrees: f64) -> bool {
        self.with_layer(id, |l| l.set_rotation(degrees))
    }

    /// Set a layer's opacity.
    pub fn clip_opacity(&mut self, id: u32, opacity: f64) -> bool {
        self.with_layer(id, |l| l.set_opacity(opacity))
    }

    /// Set a layer's volume.
    pub fn clip_volume(&mut self, id: u32, volume: f64) -> bool {
        let ok = self.with_layer(id, |l| l.set_volume(volume));
        if ok {
            self.send_volume(id);
        }
        ok
    }

    /// Set a layer's scale.
    pub fn clip_scale(&mut self, id: u32, scale: f64) -> bool {
        self.with_layer(id, |l| l.set_scale(scale))
    }

    /// Load a new source into a layer.
    pub fn clip_source(&mut self, id: u32, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        let result = self.source_op(id, path);
        accepted(id, result)
    }

    /// Start playback.
    pub fn clip_play(&mut self, id: u32) -> bool {
        self.transport(id, Layer::play, MediaRequest::Play { layer: id })
    }

    /// Pause playback.
    pub fn clip_pause(&mut self, id: u32) -> bool {
        self.transport(id, Layer::pause, MediaRequest::Pause { layer: id })
    }

    /// Stop and rewind.
    pub fn clip_stop(&mut self, id: u32) -> bool {
        self.transport(
            id,
            |l| {
                l.stop();
                Ok(())
            },
            MediaRequest::Stop { layer: id },
        )
    }

    /// Seek to `position_ms`.
    pub fn clip_position_ms(&mut self, id: u32, position_ms: f64) -> bool {
        let result = self.seek_op(id, position_ms);
        accepted(id, result)
    }

    /// Set the end-of-media behavior.
    pub fn clip_transport(&mut self, id: u32, mode: TransportMode) -> bool {
        self.with_layer(id, |l| {
            l.set_transport(mode);
            Ok(())
        })
    }

    /// Fold a media backend report into layer state and queue the matching events.
    pub fn report(&mut self, report: MediaReport) {
        let id = report.layer();
        let Some(layer) = self.layer_mut(id) else {
            tracing::debug!(layer = id, "media report for unknown layer");
            return;
        };
        let before = layer.state();
        match report {
            MediaReport::Position { position_ms, .. } => {
                layer.report_position(position_ms);
                let position_ms = layer.position_ms();
                self.events.push(SceneEvent::Position {
                    layer: id,
                    position_ms,
                });
            }
            MediaReport::Duration { duration_ms, .. } => {
                layer.report_duration(duration_ms);
                self.events.push(SceneEvent::Duration {
                    layer: id,
                    duration_ms,
                });
            }
            MediaReport::State { state, .. } => {
                layer.report_state(state);
            }
            MediaReport::EndOfMedia { .. } => {
                if layer.end_of_media() {
                    self.send(MediaRequest::Seek {
                        layer: id,
                        position_ms: 0,
                    });
                    self.send(MediaRequest::Play { layer: id });
                }
            }
            MediaReport::Error { message, .. } => {
                tracing::warn!(layer = id, %message, "media error; stopping layer");
                layer.stop();
            }
        }
        self.push_state_change(id, before);
    }

    /// Apply one decoded control command.
    ///
    /// An unknown layer yields [`GrailError::InvalidLayer`] and leaves the scene untouched.
    pub fn apply(&mut self, command: Command) -> GrailResult<()> {
        if let Some(id) = command.layer()
            && self.layer(id).is_none()
        {
            return Err(GrailError::invalid_layer(id));
        }

        match command {
            Command::CompSize { width, height } => self.set_size(width, height),
            Command::CompOpacity(v) => self.set_opacity(v)?,
            Command::CompVolume(v) => self.set_volume(v)?,
            Command::CompTestcard(show) => self.set_testcard(show),
            Command::CompTransition(v) => self.set_transition(v)?,
            Command::Blackout => self.blackout(),
            Command::Text(text) => self.set_text(text),
            Command::TextFont {
                size_pt,
                family,
                style,
            } => self.set_text_font(size_pt, &family, &style)?,
            Command::TextColor(color) => self.set_text_color(color),
            Command::TextPadding {
                left,
                top,
                right,
                bottom,
            } => self.set_text_padding(left, top, right, bottom)?,
            Command::TextAlign(h, v) => self.set_text_align(h, v),
            Command::TextShadow { x, y, blur, color } => self.set_text_shadow(x, y, blur, color)?,
            Command::TextTransform(mode) => self.set_text_transform(mode),
            Command::ClipSize {
                layer,
                width,
                height,
            } => self.layer_op(layer, |l| l.set_size(width, height))?,
            Command::ClipPosition { layer, x, y } => self.layer_op(layer, |l| l.set_position(x, y))?,
            Command::ClipRotate { layer, degrees } => {
                self.layer_op(layer, |l| l.set_rotation(degrees))?
            }
            Command::ClipOpacity { layer, value } => self.layer_op(layer, |l| l.set_opacity(value))?,
            Command::ClipVolume { layer, value } => {
                self.layer_op(layer, |l| l.set_volume(value))?;
                self.send_volume(layer);
            }
            Command::ClipScale { layer, value } => self.layer_op(layer, |l| l.set_scale(value))?,
            Command::ClipSource { layer, path } => self.source_op(layer, PathBuf::from(path))?,
            Command::ClipPlay { layer } => {
                self.transport_op(layer, Layer::play, MediaRequest::Play { layer })?
            }
            Command::ClipPause { layer } => {
                self.transport_op(layer, Layer::pause, MediaRequest::Pause { layer })?
            }
            Command::ClipStop { layer } => {
                self.clip_stop(layer);
            }
            Command::ClipSeek { layer, position_ms } => self.seek_op(layer, position_ms)?,
            Command::ClipTransport { layer, mode } => self.layer_op(layer, |l| {
                l.set_transport(mode);
                Ok(())
            })?,
        }
        Ok(())
    }

    fn layer_op<T>(
        &mut self,
        id: u32,
        f: impl FnOnce(&mut Layer) -> GrailResult<T>,
    ) -> GrailResult<T> {
        let layer = self
            .layer_mut(id)
            .ok_or_else(|| GrailError::invalid_layer(id))?;
        f(layer)
    }

    fn with_layer(&mut self, id: u32, f: impl FnOnce(&mut Layer) -> GrailResult<()>) -> bool {
        let result = self.layer_op(id, f);
        accepted(id, result)
    }

    fn source_op(&mut self, id: u32, path: PathBuf) -> GrailResult<()> {
        self.layer_op(id, |l| l.set_source(path.clone()))?;
        self.send(MediaRequest::Load { layer: id, path });
        self.send_volume(id);
        if self.layer(id).is_some_and(|l| l.state() == PlaybackState::Playing) {
            self.send(MediaRequest::Play { layer: id });
        }
        Ok(())
    }

    fn seek_op(&mut self, id: u32, position_ms: f64) -> GrailResult<()> {
        let ms = self.layer_op(id, |l| l.seek(position_ms))?;
        self.send(MediaRequest::Seek {
            layer: id,
            position_ms: ms,
        });
        self.events.push(SceneEvent::Position {
            layer: id,
            position_ms: ms,
        });
        Ok(())
    }

    fn transport_op(
        &mut self,
        id: u32,
        f: impl FnOnce(&mut Layer) -> GrailResult<()>,
        request: MediaRequest,
    ) -> GrailResult<()> {
        let before = self
            .layer(id)
            .map(Layer::state)
            .ok_or_else(|| GrailError::invalid_layer(id))?;
        self.layer_op(id, f)?;
        self.send(request);
        self.push_state_change(id, before);
        Ok(())
    }

    fn transport(
        &mut self,
        id: u32,
        f: impl FnOnce(&mut Layer) -> GrailResult<()>,
        request: MediaRequest,
    ) -> bool {
        let result = self.transport_op(id, f, request);
        accepted(id, result)
    }

    fn push_state_change(&mut self, id: u32, before: PlaybackState) {
        if let Some(state) = self.layer(id).map(Layer::state)
            && state != before
        {
            self.events.push(SceneEvent::State { layer: id, state });
        }
    }

    fn send_volume(&mut self, id: u32) {
        let Some(v) = self.layer(id).map(Layer::volume) else {
            return;
        };
        let volume = v * self.volume;
        self.send(MediaRequest::Volume { layer: id, volume });
    }

    fn send(&mut self, request: MediaRequest) {
        if let Some(media) = self.media.as_mut() {
            media.request(request);
        }
    }
}

fn accepted(id: u32, result: GrailResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(layer = id, %err, "layer operation rejected");
            false
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/display.rs"]
mod tests;
