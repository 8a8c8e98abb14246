use crate::foundation::core::{Color, Point, Rect, Vec2};
use crate::foundation::error::{GrailError, GrailResult};
use crate::render::frame::Frame;
use crate::render::warp::warp_frame;
use crate::transform::corner_pin::Viewport;
use crate::transform::homography::Homography;

/// Operator preview: the composition fitted into a widget, centered, at 90% of the limiting axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewView {
    width: u32,
    height: u32,
    background: Color,
}

impl PreviewView {
    /// Preview widget of `width` x `height` on a dark grey backdrop.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Color::rgb(0x30, 0x30, 0x30),
        }
    }

    /// Override the backdrop.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Widget size.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resize the widget.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Placement of a `scene_width` x `scene_height` composition in the widget.
    pub fn fit(&self, scene_width: u32, scene_height: u32) -> Viewport {
        Viewport::fit(
            Rect::new(0.0, 0.0, f64::from(scene_width), f64::from(scene_height)),
            f64::from(self.width),
            f64::from(self.height),
        )
    }

    /// Composition pixels to widget pixels.
    pub fn transform(&self, scene_width: u32, scene_height: u32) -> Homography {
        let vp = self.fit(scene_width, scene_height);
        Homography::scale(vp.scale, vp.scale).then(Homography::translate(Vec2::new(vp.x, vp.y)))
    }

    /// Widget pixel back to composition pixels.
    pub fn map_to_scene(&self, scene_width: u32, scene_height: u32, p: Point) -> Point {
        self.fit(scene_width, scene_height).to_source(p)
    }

    /// Draw a composited frame into the widget.
    pub fn render(&self, scene_frame: &Frame) -> GrailResult<Frame> {
        if scene_frame.is_empty() {
            return Err(GrailError::render("cannot preview an empty composition frame"));
        }
        let transform = self.transform(scene_frame.width, scene_frame.height);
        warp_frame(
            scene_frame,
            &transform,
            self.width,
            self.height,
            self.background,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/view.rs"]
mod tests;
