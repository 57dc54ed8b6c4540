//! Collision geometry for circles, polygons and triangles
//!
//! Every predicate here is a pure function of its inputs. Exactly-touching
//! shapes count as colliding: the circle tests compare with `<=` and the SAT
//! interval test is inclusive. The one exception is `point_in_polygon`, which
//! uses the half-open crossing rule (see its docs); `circle_intersects_polygon`
//! still reports a hit for a center lying on an edge through its edge-distance
//! check.

use glam::Vec2;
use thiserror::Error;

/// A triangle as three world-space vertices
pub type Triangle = [Vec2; 3];

/// Rejected geometry input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("non-finite coordinate {0}")]
    NonFiniteVertex(Vec2),
    #[error("radius must be finite and non-negative, got {0}")]
    InvalidRadius(f32),
    #[error("split step must be finite and positive, got {0}")]
    InvalidSplitStep(f32),
    #[error("split angle range {0}..{1} is not ordered")]
    InvalidAngleRange(f32, f32),
}

/// A validated polygon (≥3 finite vertices, any winding)
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
            return Err(GeometryError::NonFiniteVertex(*bad));
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        point_in_polygon(p, &self.vertices)
    }

    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        circle_intersects_polygon(center, radius, &self.vertices)
    }
}

impl TryFrom<Triangle> for Polygon {
    type Error = GeometryError;

    fn try_from(tri: Triangle) -> Result<Self, Self::Error> {
        Self::new(tri.to_vec())
    }
}

/// Circle-circle overlap, boundary-inclusive
#[inline]
pub fn circle_intersects_circle(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    c1.distance(c2) <= r1 + r2
}

/// Ray-casting parity test.
///
/// An edge toggles the result when it straddles the horizontal line through
/// `p` (half-open: `(yi > p.y) != (yj > p.y)`) and crosses it strictly to the
/// right of `p`. Horizontal edges never straddle, so the interpolation never
/// divides by zero. For an axis-aligned square this puts points on the left
/// and bottom edges inside and points on the right and top edges outside.
pub fn point_in_polygon(p: Vec2, vertices: &[Vec2]) -> bool {
    let n = vertices.len();
    if n == 0 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];

        if (vi.y > p.y) != (vj.y > p.y) {
            let cross_x = (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x;
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Closest point to `p` on segment `a→b`. A zero-length segment yields `a`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let seg = b - a;
    let len_sq = seg.length_squared();

    if len_sq == 0.0 {
        return a;
    }

    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    a + seg * t
}

/// Circle vs polygon: center enclosed, or some edge within `radius` of the center
pub fn circle_intersects_polygon(center: Vec2, radius: f32, vertices: &[Vec2]) -> bool {
    if point_in_polygon(center, vertices) {
        return true;
    }

    let n = vertices.len();
    (0..n).any(|i| {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let closest = closest_point_on_segment(center, a, b);
        center.distance(closest) <= radius
    })
}

/// Normalized edge normals of a triangle. A zero-length edge falls back to +X.
fn separating_axes(tri: &Triangle) -> [Vec2; 3] {
    std::array::from_fn(|i| {
        let edge = tri[(i + 1) % 3] - tri[i];
        if edge.length_squared() > 0.0 {
            Vec2::new(-edge.y, edge.x).normalize()
        } else {
            Vec2::X
        }
    })
}

/// Project a triangle onto `axis`, returning (min, max)
fn project(tri: &Triangle, axis: Vec2) -> (f32, f32) {
    tri.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        let d = v.dot(axis);
        (lo.min(d), hi.max(d))
    })
}

/// Triangle-triangle overlap via the Separating Axis Theorem.
///
/// Tests the three edge normals of each triangle; touching projections count
/// as overlapping, so triangles sharing only a vertex intersect.
pub fn triangles_intersect(a: &Triangle, b: &Triangle) -> bool {
    let axes_a = separating_axes(a);
    let axes_b = separating_axes(b);

    axes_a.iter().chain(axes_b.iter()).all(|&axis| {
        let (a_min, a_max) = project(a, axis);
        let (b_min, b_max) = project(b, axis);
        a_min <= b_max && b_min <= a_max
    })
}
