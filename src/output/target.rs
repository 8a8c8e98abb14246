use crate::foundation::core::{Color, Rect};
use crate::foundation::error::{GrailError, GrailResult};
use crate::render::frame::Frame;
use crate::render::warp::warp_frame;
use crate::scene::display::MAX_SIZE;
use crate::transform::corner_pin::CornerPinEditor;
use crate::transform::homography::{Homography, QuadTransform};

/// Default client size of a new output.
pub const DEFAULT_OUTPUT_SIZE: (u32, u32) = (800, 600);
/// Windowed presets offered next to the physical screens.
pub const WINDOWED_SIZES: [(u32, u32); 3] = [(1280, 720), (800, 600), (480, 320)];

/// Position and client size of an output, in desktop pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Geometry {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Client width.
    pub width: u32,
    /// Client height.
    pub height: u32,
}

impl Geometry {
    /// Build a geometry.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reject a client size that is empty or larger than `MAX_SIZE` on either side.
    pub fn validate(&self) -> GrailResult<()> {
        if !(1..=MAX_SIZE).contains(&self.width) || !(1..=MAX_SIZE).contains(&self.height) {
            return Err(GrailError::validation(format!(
                "output size {}x{} must be within 1..={MAX_SIZE}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Client rect `(0, 0, width, height)`.
    pub fn client_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// A physical display as reported by the windowing system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    /// System name, e.g. `HDMI-1` or `\\.\DISPLAY2`.
    pub name: String,
    /// Desktop geometry of the screen.
    pub geometry: Geometry,
}

/// Where and how an output shows the composition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Not shown.
    Disabled,
    /// Frameless, covering a physical screen.
    Screen {
        /// Display label, `"<name> (WxH)"`.
        label: String,
        /// Screen geometry.
        geometry: Geometry,
    },
    /// Decorated window of a fixed size.
    Windowed {
        /// Window geometry.
        geometry: Geometry,
    },
}

impl OutputMode {
    /// Menu label.
    pub fn label(&self) -> String {
        match self {
            Self::Disabled => "Disabled".to_string(),
            Self::Screen { label, .. } => label.clone(),
            Self::Windowed { geometry } => {
                format!("Windowed ({}x{})", geometry.width, geometry.height)
            }
        }
    }

    /// Every selectable mode: disabled, one per screen, then the windowed presets centered on
    /// `desktop`.
    pub fn presets(screens: &[Screen], desktop: Geometry) -> Vec<Self> {
        let mut modes = vec![Self::Disabled];
        for screen in screens {
            let name = screen
                .name
                .strip_prefix(r"\\.\")
                .unwrap_or(&screen.name);
            modes.push(Self::Screen {
                label: format!(
                    "{name} ({}x{})",
                    screen.geometry.width, screen.geometry.height
                ),
                geometry: screen.geometry,
            });
        }
        for (w, h) in WINDOWED_SIZES {
            let cx = (i64::from(desktop.x) + i64::from(desktop.width)) / 2;
            let cy = (i64::from(desktop.y) + i64::from(desktop.height)) / 2;
            let x = cx - i64::from(w) / 2;
            let y = cy - i64::from(h) / 2;
            modes.push(Self::Windowed {
                geometry: Geometry::new(
                    x.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
                    y.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
                    w,
                    h,
                ),
            });
        }
        modes
    }
}

/// One physical output: a window showing the composition through its own corner-pin.
///
/// The quad's source rect is always the output's client rect; the composition is scaled to the
/// client size first and then pinned.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputTarget {
    name: String,
    geometry: Geometry,
    frameless: bool,
    disabled: bool,
    quad: QuadTransform,
}

impl OutputTarget {
    /// Enabled, framed output with the quad filling its client rect.
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            geometry,
            frameless: false,
            disabled: false,
            quad: QuadTransform::new(geometry.client_rect()),
        }
    }

    /// Output with an explicit quad, as restored from a session.
    pub fn with_points(
        name: impl Into<String>,
        geometry: Geometry,
        frameless: bool,
        disabled: bool,
        raw_points: &[f64],
    ) -> GrailResult<Self> {
        geometry.validate()?;
        let quad = QuadTransform::from_raw(geometry.client_rect(), raw_points)?;
        Ok(Self {
            name: name.into(),
            geometry,
            frameless,
            disabled,
            quad,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Desktop geometry.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Whether the window has no decorations.
    pub fn frameless(&self) -> bool {
        self.frameless
    }

    /// Whether the output is hidden.
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Hide or show.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// The corner-pin.
    pub fn quad(&self) -> &QuadTransform {
        &self.quad
    }

    /// Replace the destination points.
    pub fn set_points(&mut self, points: [crate::foundation::core::Point; 4]) {
        self.quad.set_points(points);
    }

    /// Move or resize. The quad resets to fill the new client rect.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.quad.set_rect(geometry.client_rect());
    }

    /// Switch mode. Disabling keeps geometry and quad; any other mode resets the quad.
    pub fn set_mode(&mut self, mode: &OutputMode) {
        match mode {
            OutputMode::Disabled => self.disabled = true,
            OutputMode::Screen { geometry, .. } => {
                self.disabled = false;
                self.frameless = true;
                self.set_geometry(*geometry);
            }
            OutputMode::Windowed { geometry } => {
                self.disabled = false;
                self.frameless = false;
                self.set_geometry(*geometry);
            }
        }
    }

    /// Editor primed with this output's quad.
    pub fn editor(&self) -> CornerPinEditor {
        CornerPinEditor::from_transform(&self.quad)
    }

    /// Take the points from an editor working on this output.
    pub fn apply_editor(&mut self, editor: &CornerPinEditor) {
        self.quad.set_points(editor.points());
    }

    /// Composition pixels to output pixels: scale to the client size, then the corner-pin.
    pub fn composition_transform(&self, scene_width: u32, scene_height: u32) -> Homography {
        let sx = f64::from(self.geometry.width) / f64::from(scene_width.max(1));
        let sy = f64::from(self.geometry.height) / f64::from(scene_height.max(1));
        Homography::scale(sx, sy).then(self.quad.homography())
    }

    /// Warp a composited frame into this output's client area, on black.
    ///
    /// `None` for a disabled output.
    pub fn render(&self, scene_frame: &Frame) -> GrailResult<Option<Frame>> {
        if self.disabled {
            return Ok(None);
        }
        if scene_frame.is_empty() {
            return Err(GrailError::render("cannot present an empty composition frame"));
        }
        let transform = self.composition_transform(scene_frame.width, scene_frame.height);
        warp_frame(
            scene_frame,
            &transform,
            self.geometry.width,
            self.geometry.height,
            Color::BLACK,
        )
        .map(Some)
    }
}

/// Ordered set of outputs. Indices are positions in the list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs {
    targets: Vec<OutputTarget>,
}

impl Outputs {
    /// No outputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a framed 800x600 output named `Output N`. Returns its index.
    pub fn add(&mut self) -> usize {
        let (w, h) = DEFAULT_OUTPUT_SIZE;
        let name = format!("Output {}", self.targets.len() + 1);
        self.push(OutputTarget::new(name, Geometry::new(0, 0, w, h)))
    }

    /// Append an existing output. Returns its index.
    pub fn push(&mut self, target: OutputTarget) -> usize {
        self.targets.push(target);
        tracing::debug!(count = self.targets.len(), "output added");
        self.targets.len() - 1
    }

    /// Remove and return the output at `index`.
    pub fn remove(&mut self, index: usize) -> Option<OutputTarget> {
        (index < self.targets.len()).then(|| self.targets.remove(index))
    }

    /// Output at `index`.
    pub fn get(&self, index: usize) -> Option<&OutputTarget> {
        self.targets.get(index)
    }

    /// Mutable output at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut OutputTarget> {
        self.targets.get_mut(index)
    }

    /// Rename the output at `index`. `false` if there is none.
    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.targets.get_mut(index) {
            Some(t) => {
                t.set_name(name);
                true
            }
            None => false,
        }
    }

    /// Switch the mode of the output at `index`. `false` if there is none.
    pub fn set_mode(&mut self, index: usize, mode: &OutputMode) -> bool {
        match self.targets.get_mut(index) {
            Some(t) => {
                t.set_mode(mode);
                true
            }
            None => false,
        }
    }

    /// Outputs in order.
    pub fn iter(&self) -> std::slice::Iter<'_, OutputTarget> {
        self.targets.iter()
    }

    /// Number of outputs.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether there are no outputs.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl<'a> IntoIterator for &'a Outputs {
    type Item = &'a OutputTarget;
    type IntoIter = std::slice::Iter<'a, OutputTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/target.rs"]
mod tests;
