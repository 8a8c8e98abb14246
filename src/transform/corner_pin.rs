//! Toolkit-free model of the corner-pin editor used to align outputs.
//!
//! The editor keeps a source rectangle and four destination points in source units. A host
//! toolkit feeds it pointer and keyboard input in widget pixels and paints whatever
//! [`CornerPinEditor::handles`] and [`CornerPinEditor::status_text`] report.

use crate::foundation::core::{Point, Rect, Vec2};
use crate::transform::homography::{Homography, QuadTransform, rect_corners};

/// Pointer hit radius around a handle, in widget pixels.
pub const HANDLE_RADIUS: f64 = 5.0;

/// Fraction of the viewport the source rect occupies after fitting.
pub const VIEWPORT_FILL: f64 = 0.9;

/// One of the eight draggable handles: four corners followed by four edge midpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Corner 0.
    TopLeft,
    /// Corner 1.
    TopRight,
    /// Corner 2.
    BottomRight,
    /// Corner 3.
    BottomLeft,
    /// Midpoint of corners 0 and 1.
    Top,
    /// Midpoint of corners 1 and 2.
    Right,
    /// Midpoint of corners 2 and 3.
    Bottom,
    /// Midpoint of corners 3 and 0.
    Left,
}

impl Handle {
    /// All handles in hit-test order.
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomRight,
        Handle::BottomLeft,
        Handle::Top,
        Handle::Right,
        Handle::Bottom,
        Handle::Left,
    ];

    /// Stable index, 0..=3 for corners and 4..=7 for edges.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this is one of the four corner handles.
    pub fn is_corner(self) -> bool {
        self.index() < 4
    }

    /// Corner indices spanned by an edge handle.
    fn edge(self) -> Option<(usize, usize, Axis)> {
        match self {
            Handle::Top => Some((0, 1, Axis::Vertical)),
            Handle::Right => Some((1, 2, Axis::Horizontal)),
            Handle::Bottom => Some((2, 3, Axis::Vertical)),
            Handle::Left => Some((3, 0, Axis::Horizontal)),
            _ => None,
        }
    }

    fn side_name(self) -> &'static str {
        match self {
            Handle::Top => "Top",
            Handle::Right => "Right",
            Handle::Bottom => "Bottom",
            Handle::Left => "Left",
            _ => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Arrow keys accepted by [`CornerPinEditor::nudge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowKey {
    /// Move up.
    Up,
    /// Move down.
    Down,
    /// Move left.
    Left,
    /// Move right.
    Right,
}

/// Placement of the source rect inside the editor widget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Widget-space x offset of the source origin.
    pub x: f64,
    /// Widget-space y offset of the source origin.
    pub y: f64,
    /// Widget pixels per source unit.
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Fit `source` into a `width` x `height` widget, centered, at 90% of the limiting axis.
    pub fn fit(source: Rect, width: f64, height: f64) -> Self {
        let (sw, sh) = (source.width(), source.height());
        if !(sw > 0.0 && sh > 0.0 && width > 0.0 && height > 0.0) {
            return Self::default();
        }
        let scale = (width / sw).min(height / sh) * VIEWPORT_FILL;
        Self {
            x: (width - sw * scale) / 2.0,
            y: (height - sh * scale) / 2.0,
            scale,
        }
    }

    /// Source units to widget pixels.
    pub fn to_widget(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.x, p.y * self.scale + self.y)
    }

    /// Widget pixels to source units.
    pub fn to_source(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.scale, (p.y - self.y) / self.scale)
    }
}

type UpdateHook = Box<dyn FnMut(&[Point; 4]) + Send>;

/// Interactive corner-pin state machine.
pub struct CornerPinEditor {
    rect: Rect,
    points: [Point; 4],
    active: Option<Handle>,
    last: Option<Handle>,
    grab: Vec2,
    allow_affine: bool,
    viewport: Viewport,
    widget: Option<(f64, f64)>,
    status: String,
    revision: u64,
    on_updated: Option<UpdateHook>,
}

impl std::fmt::Debug for CornerPinEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CornerPinEditor")
            .field("rect", &self.rect)
            .field("points", &self.points)
            .field("active", &self.active)
            .field("last", &self.last)
            .field("allow_affine", &self.allow_affine)
            .field("viewport", &self.viewport)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl CornerPinEditor {
    /// New editor over a `width` x `height` source, with the quad filling it.
    pub fn new(width: f64, height: f64) -> Self {
        let rect = Rect::new(0.0, 0.0, width, height);
        Self {
            rect,
            points: rect_corners(rect),
            active: None,
            last: None,
            grab: Vec2::ZERO,
            allow_affine: true,
            viewport: Viewport::default(),
            widget: None,
            status: String::new(),
            revision: 0,
            on_updated: None,
        }
    }

    /// Editor initialised from an existing transform.
    pub fn from_transform(transform: &QuadTransform) -> Self {
        let mut editor = Self::new(0.0, 0.0);
        editor.rect = transform.rect();
        editor.points = transform.points();
        editor
    }

    /// Register the callback invoked after every edit.
    pub fn set_on_updated(&mut self, hook: impl FnMut(&[Point; 4]) + Send + 'static) {
        self.on_updated = Some(Box::new(hook));
    }

    /// Source rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Replace the source rectangle and reset the quad to fill it. The viewport is refit to the
    /// last widget size.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
        if let Some((width, height)) = self.widget {
            self.viewport = Viewport::fit(rect, width, height);
        }
        self.fill();
    }

    /// Current destination points (TL, TR, BR, BL) in source units.
    pub fn points(&self) -> [Point; 4] {
        self.points
    }

    /// Replace all four points.
    pub fn set_points(&mut self, points: [Point; 4]) {
        self.points = points;
        self.updated();
    }

    /// Points as `[x1, y1, .., x4, y4]`.
    pub fn raw_points(&self) -> [f64; 8] {
        self.quad().raw_points()
    }

    /// Axis-aligned bounds of the quad.
    pub fn bounding_rect(&self) -> Rect {
        self.quad().bounding_rect()
    }

    /// Snapshot as a [`QuadTransform`].
    pub fn quad(&self) -> QuadTransform {
        QuadTransform::with_points(self.rect, self.points)
    }

    /// Projective transform for the current points.
    pub fn transformation(&self) -> Homography {
        self.quad().homography()
    }

    /// Whether corner handles may be dragged freely.
    pub fn allow_affine(&self) -> bool {
        self.allow_affine
    }

    /// Enable or disable free corner dragging.
    pub fn set_allow_affine(&mut self, allow: bool) {
        self.allow_affine = allow;
    }

    /// Monotonic edit counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Status line for the host to paint.
    pub fn status_text(&self) -> &str {
        &self.status
    }

    /// Handle currently being dragged.
    pub fn active_handle(&self) -> Option<Handle> {
        self.active
    }

    /// Most recently grabbed handle.
    pub fn last_handle(&self) -> Option<Handle> {
        self.last
    }

    /// Current widget placement.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Refit the source rect into a widget of the given size.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.widget = Some((width, height));
        self.viewport = Viewport::fit(self.rect, width, height);
    }

    /// Source units to widget pixels.
    pub fn map_to_widget(&self, p: Point) -> Point {
        self.viewport.to_widget(p)
    }

    /// Widget pixels to source units.
    pub fn map_to_source(&self, p: Point) -> Point {
        self.viewport.to_source(p)
    }

    /// Handle positions in widget pixels, in [`Handle::ALL`] order.
    pub fn handles(&self) -> [(Handle, Point); 8] {
        let w = self.points.map(|p| self.viewport.to_widget(p));
        Handle::ALL.map(|h| (h, handle_position(&w, h)))
    }

    /// Quad fills the whole source rect.
    pub fn fill(&mut self) {
        let Rect { x0, y0, x1, y1 } = self.rect;
        self.set_points_xy(x0, y0, x1, y1);
    }

    /// Quad covers the left half.
    pub fn left(&mut self) {
        let Rect { x0, y0, x1, y1 } = self.rect;
        self.set_points_xy(x0, y0, (x0 + x1) / 2.0, y1);
    }

    /// Quad covers the right half.
    pub fn right(&mut self) {
        let Rect { x0, y0, x1, y1 } = self.rect;
        self.set_points_xy((x0 + x1) / 2.0, y0, x1, y1);
    }

    /// Quad covers the top half.
    pub fn top(&mut self) {
        let Rect { x0, y0, x1, y1 } = self.rect;
        self.set_points_xy(x0, y0, x1, (y0 + y1) / 2.0);
    }

    /// Quad covers the bottom half.
    pub fn bottom(&mut self) {
        let Rect { x0, y0, x1, y1 } = self.rect;
        self.set_points_xy(x0, (y0 + y1) / 2.0, x1, y1);
    }

    /// Translate the quad so its bounding box is centered in the source rect.
    pub fn center(&mut self) {
        let bounds = self.bounding_rect();
        let delta = self.rect.center() - bounds.center();
        self.points = self.points.map(|p| p + delta);
        self.updated();
    }

    fn set_points_xy(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.set_points(rect_corners(Rect::new(x0, y0, x1, y1)));
    }

    /// Start a drag at `p` (widget pixels). Returns the grabbed handle, if any.
    pub fn pointer_press(&mut self, p: Point) -> Option<Handle> {
        let mut hit = None;
        for (handle, pos) in self.handles() {
            if pos.distance(p) <= HANDLE_RADIUS {
                hit = Some((handle, p - pos));
            }
        }
        if let Some((handle, grab)) = hit {
            self.active = Some(handle);
            self.last = Some(handle);
            self.grab = grab;
        }
        hit.map(|(h, _)| h)
    }

    /// Continue a drag at `p` (widget pixels). Returns `true` when the quad changed.
    pub fn pointer_move(&mut self, p: Point) -> bool {
        let Some(handle) = self.active else {
            self.status.clear();
            return false;
        };
        let target = self.viewport.to_source(p - self.grab);

        if handle.is_corner() {
            if !self.allow_affine {
                self.status.clear();
                return false;
            }
            self.points[handle.index()] = target;
            self.status = format!("({}, {})", target.x as i64, target.y as i64);
            self.updated();
            return true;
        }

        let Some((a, b, axis)) = handle.edge() else {
            return false;
        };
        let mid = self.points[a].midpoint(self.points[b]);
        let mut delta = target - mid;
        if !self.allow_affine {
            match axis {
                Axis::Horizontal => delta.y = 0.0,
                Axis::Vertical => delta.x = 0.0,
            }
        }
        self.points[a] += delta;
        self.points[b] += delta;
        self.status = format!("{} side", handle.side_name());
        self.updated();
        true
    }

    /// End the current drag.
    pub fn pointer_release(&mut self) {
        self.active = None;
        self.grab = Vec2::ZERO;
    }

    /// Move the last grabbed corner by one widget pixel. Edge handles are ignored.
    pub fn nudge(&mut self, key: ArrowKey) -> bool {
        let Some(handle) = self.last.filter(|h| h.is_corner()) else {
            return false;
        };
        let step = if self.viewport.scale > 0.0 {
            1.0 / self.viewport.scale
        } else {
            1.0
        };
        let delta = match key {
            ArrowKey::Up => Vec2::new(0.0, -step),
            ArrowKey::Down => Vec2::new(0.0, step),
            ArrowKey::Left => Vec2::new(-step, 0.0),
            ArrowKey::Right => Vec2::new(step, 0.0),
        };
        self.points[handle.index()] += delta;
        self.updated();
        true
    }

    fn updated(&mut self) {
        self.revision += 1;
        if let Some(hook) = self.on_updated.as_mut() {
            hook(&self.points);
        }
    }
}

fn handle_position(corners: &[Point; 4], handle: Handle) -> Point {
    match handle.edge() {
        Some((a, b, _)) => corners[a].midpoint(corners[b]),
        None => corners[handle.index()],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/corner_pin.rs"]
mod tests;
