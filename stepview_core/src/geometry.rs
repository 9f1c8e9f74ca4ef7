//! Geometry kernel: the small set of vector helpers shared by the
//! diagnostics and viewport layers.

use nalgebra::Vector2;

/// 2D vector used throughout the core.
pub type Vec2 = Vector2<f64>;

/// Result of projecting a point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Closest point on the segment
    pub point: Vec2,
    /// Position along a->b, clamped to [0, 1]
    pub t: f64,
}

/// Closest point on segment a-b to p.
///
/// A zero-length segment projects everything onto `a` with t = 0, so
/// callers never divide by a degenerate length.
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> SegmentProjection {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return SegmentProjection { point: a, t: 0.0 };
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    SegmentProjection { point: a + ab * t, t }
}

/// Linear interpolation between two scalars.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Unit vector in the direction of `v`, or zero when `v` has no magnitude.
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vec2::zeros)
}

/// Clockwise perpendicular of `v`.
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}
