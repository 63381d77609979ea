// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon loop model: corners, normal estimation, orientation and
//! convexity.

use nalgebra::{Point3, Vector3};

use crate::math::{approx_point_eq, dot64, normalize_or_zero, turn, TurnDirection};

/// One polygon corner: a position plus the local identity it had in the
/// source face record.
///
/// The index is local to the polygon being triangulated, not the global
/// vertex table. Corners that resolve to the same table entry share one
/// index, which is what lets triangulator output map back to per-corner
/// attribute text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Local identity within the polygon.
    pub index: usize,
    /// Position in model space.
    pub position: Point3<f32>,
}

impl Corner {
    /// Create a corner.
    #[inline]
    pub fn new(index: usize, position: Point3<f32>) -> Self {
        Self { index, position }
    }

    /// Approximate positional equality (1e-6 per axis).
    #[inline]
    pub fn approx_eq(&self, other: &Corner) -> bool {
        approx_point_eq(&self.position, &other.position)
    }
}

/// Best-fit unit normal of a point loop via Newell's method.
///
/// Summing over every cyclic edge makes the estimate robust to mild
/// non-planarity and ordering noise, unlike a single cross product of
/// two edges. Returns the zero vector for degenerate input (fewer than
/// three points, collinear or coincident loops).
pub fn newell_normal(polygon: &[Corner]) -> Vector3<f32> {
    let n = polygon.len();

    if n < 3 {
        return Vector3::zeros();
    }

    let mut nx = 0.0f64;
    let mut ny = 0.0f64;
    let mut nz = 0.0f64;

    for i in 0..n {
        let item = &polygon[i].position;
        let next = &polygon[(i + 1) % n].position;

        nx += f64::from(next.y - item.y) * f64::from(next.z + item.z);
        ny += f64::from(next.z - item.z) * f64::from(next.x + item.x);
        nz += f64::from(next.x - item.x) * f64::from(next.y + item.y);
    }

    normalize_or_zero(&Vector3::new(nx as f32, ny as f32, nz as f32))
}

/// Signed orientation of the loop relative to `normal`: the sum over all
/// cyclic vertex triples of `dot(cross(item - prev, next - item), normal)`.
fn orientation_sum(polygon: &[Corner], normal: &Vector3<f32>) -> f64 {
    let n = polygon.len();
    let mut sum = 0.0f64;

    for i in 0..n {
        let prev = &polygon[(i + n - 1) % n].position;
        let item = &polygon[i].position;
        let next = &polygon[(i + 1) % n].position;

        let edge = item - prev;
        let to_next = next - item;

        sum += dot64(&edge.cross(&to_next), normal);
    }

    sum
}

/// True when the loop winds clockwise relative to `normal`.
pub fn is_clockwise(polygon: &[Corner], normal: &Vector3<f32>) -> bool {
    polygon.len() >= 3 && orientation_sum(polygon, normal) < 0.0
}

/// Reverse the loop unless it already winds clockwise relative to
/// `normal`. The ear tests assume this sense; normalizing once removes
/// winding conditionals from every predicate downstream.
pub fn make_clockwise(polygon: &mut [Corner], normal: &Vector3<f32>) {
    if polygon.len() < 3 {
        return;
    }

    if !is_clockwise(polygon, normal) {
        polygon.reverse();
    }
}

/// Convexity test: every non-collinear vertex must turn the same way.
///
/// `NoTurn` vertices neither establish nor violate the consensus sign.
pub fn is_convex(polygon: &[Corner], normal: &Vector3<f32>) -> bool {
    let n = polygon.len();

    if n < 3 {
        return false;
    }

    if n == 3 {
        return true;
    }

    let mut consensus = TurnDirection::NoTurn;

    for i in 0..n {
        let prev = &polygon[(i + n - 1) % n];
        let item = &polygon[i];
        let next = &polygon[(i + 1) % n];

        let u = normalize_or_zero(&(item.position - prev.position));
        let item_turn = turn(&prev.position, &u, normal, &next.position);

        if item_turn == TurnDirection::NoTurn {
            continue;
        }

        if consensus == TurnDirection::NoTurn {
            consensus = item_turn;
        }

        if consensus != item_turn {
            return false;
        }
    }

    true
}

/// Drop corners whose local index repeats the cyclic successor's.
///
/// The comparison is cyclic, so a duplicate spanning the wrap-around
/// (last == first) is removed too.
pub fn dedup_consecutive(polygon: &mut Vec<Corner>) {
    let n = polygon.len();

    if n == 0 {
        return;
    }

    let copy = std::mem::take(polygon);

    for i in 0..n {
        if copy[i].index == copy[(i + 1) % n].index {
            continue;
        }
        polygon.push(copy[i]);
    }
}
