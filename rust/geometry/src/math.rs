// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar and vector helpers shared by the triangulation predicates.
//!
//! Coordinates are `f32` (the source format is single precision); the
//! dot products feeding the predicates accumulate in `f64`.

use nalgebra::{Point3, Vector3};

/// Per-axis tolerance for point coincidence.
pub const EPSILON: f32 = 1e-6;

/// Threshold on the normal-projected cross product below which a vertex
/// counts as collinear.
const TURN_THRESHOLD: f64 = 0.001;

/// Turn direction at a polygon vertex, relative to a reference normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    /// Convex corner for a clockwise-wound loop.
    Right,
    /// Reflex corner.
    Left,
    /// Collinear within tolerance.
    NoTurn,
}

/// Dot product accumulated in `f64`.
#[inline]
pub fn dot64(u: &Vector3<f32>, v: &Vector3<f32>) -> f64 {
    f64::from(u.x) * f64::from(v.x)
        + f64::from(u.y) * f64::from(v.y)
        + f64::from(u.z) * f64::from(v.z)
}

/// Normalize, returning the zero vector for zero-length input instead of
/// NaN components.
#[inline]
pub fn normalize_or_zero(v: &Vector3<f32>) -> Vector3<f32> {
    let len = v.norm();
    if len == 0.0 {
        Vector3::zeros()
    } else {
        v / len
    }
}

/// Component-wise approximate equality within [`EPSILON`].
#[inline]
pub fn approx_point_eq(a: &Point3<f32>, b: &Point3<f32>) -> bool {
    (a.x - b.x).abs() <= EPSILON && (a.y - b.y).abs() <= EPSILON && (a.z - b.z).abs() <= EPSILON
}

/// Classify the turn taken at a vertex.
///
/// `u` is the normalized incoming edge direction (`item - prev`), `next`
/// the vertex that follows. The sign convention assumes the loop winds
/// clockwise relative to `normal`.
#[inline]
pub fn turn(
    prev: &Point3<f32>,
    u: &Vector3<f32>,
    normal: &Vector3<f32>,
    next: &Point3<f32>,
) -> TurnDirection {
    let v = (next - prev).cross(u);
    let d = dot64(&v, normal);

    if d > TURN_THRESHOLD {
        TurnDirection::Right
    } else if d < -TURN_THRESHOLD {
        TurnDirection::Left
    } else {
        TurnDirection::NoTurn
    }
}

/// Squared area of triangle (a, b, c); ear ranking never needs the root.
#[inline]
pub fn triangle_area_squared(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> f64 {
    let cross = (b - a).cross(&(c - a));
    dot64(&cross, &cross) / 4.0
}

/// Result of a barycentric containment test.
#[derive(Debug, Clone, Copy)]
pub struct Containment {
    /// Point lies inside the triangle (boundary included on two sides,
    /// see `point_in_triangle`).
    pub inside: bool,
    /// Point lies within machine epsilon of an edge.
    pub on_edge: bool,
}

/// Barycentric test of `p` against triangle (a, b, c).
///
/// A degenerate (zero-area) triangle contains nothing. The boundary is
/// classified separately via `on_edge` so callers can treat contact as a
/// violation.
pub fn point_in_triangle(
    a: &Point3<f32>,
    b: &Point3<f32>,
    c: &Point3<f32>,
    p: &Point3<f32>,
) -> Containment {
    let zero = f64::EPSILON;

    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = dot64(&v0, &v0);
    let dot01 = dot64(&v0, &v1);
    let dot02 = dot64(&v0, &v2);
    let dot11 = dot64(&v1, &v1);
    let dot12 = dot64(&v1, &v2);

    let denom = dot00 * dot11 - dot01 * dot01;

    if denom.abs() < zero {
        return Containment {
            inside: false,
            on_edge: false,
        };
    }

    let inv_denom = 1.0 / denom;

    let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
    let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

    Containment {
        inside: u >= 0.0 && v >= 0.0 && u + v < 1.0,
        on_edge: u.abs() < zero || v.abs() < zero || (u + v - 1.0).abs() < zero,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_directions() {
        // Clockwise-wound square in the XY plane, normal -Z.
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let prev = Point3::new(0.0, 0.0, 0.0);
        let item = Point3::new(1.0, 0.0, 0.0);
        let u = normalize_or_zero(&(item - prev));

        let convex_next = Point3::new(1.0, 1.0, 0.0);
        assert_eq!(turn(&prev, &u, &normal, &convex_next), TurnDirection::Right);

        let reflex_next = Point3::new(1.0, -1.0, 0.0);
        assert_eq!(turn(&prev, &u, &normal, &reflex_next), TurnDirection::Left);

        let straight_next = Point3::new(2.0, 0.0, 0.0);
        assert_eq!(turn(&prev, &u, &normal, &straight_next), TurnDirection::NoTurn);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let v = normalize_or_zero(&Vector3::zeros());
        assert_eq!(v, Vector3::zeros());
    }

    #[test]
    fn test_point_in_triangle() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);
        let c = Point3::new(0.0, 2.0, 0.0);

        let hit = point_in_triangle(&a, &b, &c, &Point3::new(0.5, 0.5, 0.0));
        assert!(hit.inside);
        assert!(!hit.on_edge);

        let miss = point_in_triangle(&a, &b, &c, &Point3::new(3.0, 3.0, 0.0));
        assert!(!miss.inside);

        // Vertex contact sits on two edges at once.
        let corner = point_in_triangle(&a, &b, &c, &a);
        assert!(corner.on_edge);
    }

    #[test]
    fn test_degenerate_triangle_contains_nothing() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(2.0, 0.0, 0.0);

        let hit = point_in_triangle(&a, &b, &c, &Point3::new(1.0, 0.0, 0.0));
        assert!(!hit.inside);
        assert!(!hit.on_edge);
    }

    #[test]
    fn test_triangle_area_squared() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        // Area 0.5, squared 0.25.
        assert!((triangle_area_squared(&a, &b, &c) - 0.25).abs() < 1e-9);
    }
}
