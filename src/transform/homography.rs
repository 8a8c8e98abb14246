//! Projective transforms and the rect-to-quad solver.

use std::ops::Mul;

use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::foundation::error::{GrailError, GrailResult};
use crate::foundation::math::cross;

const EPS: f64 = 1e-12;
const COLLINEAR_EPS: f64 = 1e-9;

/// A 2D projective transform stored as a row-major 3x3 matrix.
///
/// Points are treated as column vectors `(x, y, 1)`, so `a * b` applies `b` first
/// (the same convention as [`kurbo::Affine`]).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Homography {
    m: [f64; 9],
}

impl Default for Homography {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Homography {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Build from raw row-major coefficients.
    pub const fn new(m: [f64; 9]) -> Self {
        Self { m }
    }

    /// Raw row-major coefficients.
    pub fn coeffs(&self) -> [f64; 9] {
        self.m
    }

    /// Lift an affine transform.
    pub fn from_affine(a: Affine) -> Self {
        let [a, b, c, d, e, f] = a.as_coeffs();
        Self::new([a, c, e, b, d, f, 0.0, 0.0, 1.0])
    }

    /// Non-uniform scale about the origin.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new([sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0])
    }

    /// Translation.
    pub fn translate(v: Vec2) -> Self {
        Self::new([1.0, 0.0, v.x, 0.0, 1.0, v.y, 0.0, 0.0, 1.0])
    }

    /// Apply `self`, then `next`.
    pub fn then(self, next: Self) -> Self {
        next * self
    }

    /// Map a point. Points on the line at infinity are returned unchanged.
    pub fn map_point(&self, p: Point) -> Point {
        let m = &self.m;
        let w = m[6] * p.x + m[7] * p.y + m[8];
        if w.abs() < EPS {
            return p;
        }
        Point::new(
            (m[0] * p.x + m[1] * p.y + m[2]) / w,
            (m[3] * p.x + m[4] * p.y + m[5]) / w,
        )
    }

    /// Matrix determinant.
    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < EPS {
            return None;
        }
        let m = &self.m;
        let inv = 1.0 / det;
        Some(Self::new([
            (m[4] * m[8] - m[5] * m[7]) * inv,
            (m[2] * m[7] - m[1] * m[8]) * inv,
            (m[1] * m[5] - m[2] * m[4]) * inv,
            (m[5] * m[6] - m[3] * m[8]) * inv,
            (m[0] * m[8] - m[2] * m[6]) * inv,
            (m[2] * m[3] - m[0] * m[5]) * inv,
            (m[3] * m[7] - m[4] * m[6]) * inv,
            (m[1] * m[6] - m[0] * m[7]) * inv,
            (m[0] * m[4] - m[1] * m[3]) * inv,
        ]))
    }

    /// Whether the bottom row is `(0, 0, w)` with `w != 0`.
    pub fn is_affine(&self) -> bool {
        self.m[6].abs() < EPS && self.m[7].abs() < EPS && self.m[8].abs() >= EPS
    }

    /// The equivalent affine transform, if this homography has no perspective part.
    pub fn to_affine(&self) -> Option<Affine> {
        if !self.is_affine() {
            return None;
        }
        let m = &self.m;
        let w = m[8];
        Some(Affine::new([
            m[0] / w,
            m[3] / w,
            m[1] / w,
            m[4] / w,
            m[2] / w,
            m[5] / w,
        ]))
    }

    /// Solve the projective map sending the corners of `rect` (top-left, top-right,
    /// bottom-right, bottom-left) onto `quad` exactly.
    ///
    /// Degenerate input (empty rect, non-finite values, three collinear destination
    /// points) yields [`Homography::IDENTITY`].
    pub fn rect_to_quad(rect: Rect, quad: [Point; 4]) -> Self {
        if quad_is_degenerate(&quad) || !rect_is_valid(rect) {
            tracing::debug!(?rect, ?quad, "degenerate quad; using identity transform");
            return Self::IDENTITY;
        }
        let Some(square) = square_to_quad(quad) else {
            tracing::debug!(?quad, "quad solve failed; using identity transform");
            return Self::IDENTITY;
        };
        let normalize = Self::translate(Vec2::new(-rect.x0, -rect.y0))
            .then(Self::scale(1.0 / rect.width(), 1.0 / rect.height()));
        square * normalize
    }
}

impl Mul for Homography {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = &self.m;
        let b = &rhs.m;
        let mut out = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[row * 3 + col] = a[row * 3] * b[col]
                    + a[row * 3 + 1] * b[3 + col]
                    + a[row * 3 + 2] * b[6 + col];
            }
        }
        Self::new(out)
    }
}

fn rect_is_valid(rect: Rect) -> bool {
    let w = rect.width();
    let h = rect.height();
    rect.x0.is_finite() && rect.y0.is_finite() && w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
}

fn quad_is_degenerate(quad: &[Point; 4]) -> bool {
    if quad.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return true;
    }
    let bounds = quad_bounds(quad);
    let extent = bounds.width().max(bounds.height());
    if extent <= 0.0 {
        return true;
    }
    let tol = COLLINEAR_EPS * extent * extent;
    const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (1, 2, 3), (2, 3, 0), (3, 0, 1)];
    TRIPLES
        .iter()
        .any(|&(i, j, k)| cross(quad[i], quad[j], quad[k]).abs() <= tol)
}

/// Unit square to quad (Heckbert's closed form).
fn square_to_quad(q: [Point; 4]) -> Option<Homography> {
    let [p0, p1, p2, p3] = q;
    let sx = p0.x - p1.x + p2.x - p3.x;
    let sy = p0.y - p1.y + p2.y - p3.y;

    if sx.abs() < EPS && sy.abs() < EPS {
        return Some(Homography::new([
            p1.x - p0.x,
            p2.x - p1.x,
            p0.x,
            p1.y - p0.y,
            p2.y - p1.y,
            p0.y,
            0.0,
            0.0,
            1.0,
        ]));
    }

    let dx1 = p1.x - p2.x;
    let dx2 = p3.x - p2.x;
    let dy1 = p1.y - p2.y;
    let dy2 = p3.y - p2.y;
    let den = dx1 * dy2 - dx2 * dy1;
    if den.abs() < EPS {
        return None;
    }
    let g = (sx * dy2 - dx2 * sy) / den;
    let h = (dx1 * sy - sx * dy1) / den;

    Some(Homography::new([
        p1.x - p0.x + g * p1.x,
        p3.x - p0.x + h * p3.x,
        p0.x,
        p1.y - p0.y + g * p1.y,
        p3.y - p0.y + h * p3.y,
        p0.y,
        g,
        h,
        1.0,
    ]))
}

fn quad_bounds(quad: &[Point; 4]) -> Rect {
    let mut r = Rect::from_points(quad[0], quad[0]);
    for &p in &quad[1..] {
        r = r.union_pt(p);
    }
    r
}

/// A source rectangle plus the quadrilateral it is pinned to.
///
/// Points are ordered top-left, top-right, bottom-right, bottom-left.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuadTransform {
    rect: Rect,
    points: [Point; 4],
}

impl QuadTransform {
    /// Identity mapping: the quad covers `rect` exactly.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            points: rect_corners(rect),
        }
    }

    /// Mapping of `rect` onto an explicit quad.
    pub fn with_points(rect: Rect, points: [Point; 4]) -> Self {
        Self { rect, points }
    }

    /// Rebuild from the flat `[x1, y1, .., x4, y4]` representation used on disk.
    pub fn from_raw(rect: Rect, raw: &[f64]) -> GrailResult<Self> {
        let [x1, y1, x2, y2, x3, y3, x4, y4] = <[f64; 8]>::try_from(raw).map_err(|_| {
            GrailError::validation(format!("quad needs 8 coordinates, got {}", raw.len()))
        })?;
        Ok(Self::with_points(
            rect,
            [
                Point::new(x1, y1),
                Point::new(x2, y2),
                Point::new(x3, y3),
                Point::new(x4, y4),
            ],
        ))
    }

    /// Source rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Destination points.
    pub fn points(&self) -> [Point; 4] {
        self.points
    }

    /// Replace the destination points.
    pub fn set_points(&mut self, points: [Point; 4]) {
        self.points = points;
    }

    /// Replace the source rectangle and reset the quad to cover it.
    pub fn set_rect(&mut self, rect: Rect) {
        *self = Self::new(rect);
    }

    /// Flat `[x1, y1, .., x4, y4]` coordinates.
    pub fn raw_points(&self) -> [f64; 8] {
        let [a, b, c, d] = self.points;
        [a.x, a.y, b.x, b.y, c.x, c.y, d.x, d.y]
    }

    /// Solve the projective transform for the current points.
    pub fn homography(&self) -> Homography {
        Homography::rect_to_quad(self.rect, self.points)
    }

    /// Map a source-space point through the current transform.
    pub fn map_point(&self, p: Point) -> Point {
        self.homography().map_point(p)
    }

    /// Axis-aligned bounds of the quad.
    pub fn bounding_rect(&self) -> Rect {
        quad_bounds(&self.points)
    }

    /// Whether the quad falls back to the identity transform.
    pub fn is_degenerate(&self) -> bool {
        quad_is_degenerate(&self.points) || !rect_is_valid(self.rect)
    }
}

/// Corners of `rect` in top-left, top-right, bottom-right, bottom-left order.
pub fn rect_corners(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/transform/homography.rs"]
mod tests;
