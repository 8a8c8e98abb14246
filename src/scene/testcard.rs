use crate::foundation::core::{Color, Point, Rect};

/// Spacing of the alignment grid in pixels.
pub const GRID_SPACING: f64 = 50.0;

/// Geometry of the alignment test card for a given composition size.
///
/// Drawing order: background fill, 1px white grid lines every [`GRID_SPACING`] pixels measured from
/// the center, 3px center cross, 5px circles, centered label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TestCard {
    width: u32,
    height: u32,
}

impl TestCard {
    /// Fill behind everything.
    pub const BACKGROUND: Color = Color::rgb(0x5a, 0x5a, 0x5a);
    /// Grid and label color.
    pub const FOREGROUND: Color = Color::WHITE;
    /// Center cross and circle color.
    pub const ACCENT: Color = Color::rgb(0x20, 0x20, 0x20);
    /// Width of the grid lines.
    pub const GRID_WIDTH: f64 = 1.0;
    /// Width of the center cross.
    pub const AXIS_WIDTH: f64 = 3.0;
    /// Width of the circle outlines.
    pub const CIRCLE_WIDTH: f64 = 5.0;
    /// Label size in points.
    pub const LABEL_SIZE_PT: f64 = 24.0;
    /// Label inset from the card edges.
    pub const LABEL_INSET: f64 = 10.0;

    /// Card for a `width` x `height` composition.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Card width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Card height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Full card rect.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Centered caption.
    pub fn label(&self) -> String {
        format!("Composition {} x {}", self.width, self.height)
    }

    /// Box the caption wraps inside.
    pub fn label_box(&self) -> Rect {
        self.rect().inset(-Self::LABEL_INSET)
    }

    /// Offsets of grid lines from the center, in pixels.
    pub fn grid_offsets(&self) -> Vec<f64> {
        let lines = (f64::from(self.width.max(self.height)) / GRID_SPACING) as i64;
        (-lines..lines).map(|i| i as f64 * GRID_SPACING).collect()
    }

    /// Grid line positions: `y` of the horizontal lines and `x` of the vertical ones.
    pub fn grid_lines(&self) -> (Vec<f64>, Vec<f64>) {
        let c = self.rect().center();
        let offsets = self.grid_offsets();
        let ys = offsets.iter().map(|o| c.y + o).collect();
        let xs = offsets.iter().map(|o| c.x + o).collect();
        (ys, xs)
    }

    /// Circle radius: half the shorter side.
    pub fn circle_radius(&self) -> f64 {
        f64::from(self.width.min(self.height)) / 2.0
    }

    /// Centers of the row of circles along the horizontal center line.
    pub fn circle_centers(&self) -> Vec<Point> {
        let radius = self.circle_radius();
        if radius <= 0.0 {
            return Vec::new();
        }
        let c = self.rect().center();
        let count = ((f64::from(self.width) / radius) / 2.0) as i64 + 1;
        (-count..=count)
            .map(|i| Point::new(c.x + i as f64 * radius * 1.25, c.y))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/testcard.rs"]
mod tests;
