// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ear-clipping decomposition of polygon loops.

use nalgebra::Vector3;

use crate::math::{
    dot64, normalize_or_zero, point_in_triangle, triangle_area_squared, turn, TurnDirection,
};
use crate::polygon::{
    dedup_consecutive, is_convex, make_clockwise, newell_normal, Corner,
};

/// One output triangle, corners in emission order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First corner.
    pub p0: Corner,
    /// Second corner.
    pub p1: Corner,
    /// Third corner.
    pub p2: Corner,
}

impl Triangle {
    /// Create a triangle.
    #[inline]
    pub fn new(p0: Corner, p1: Corner, p2: Corner) -> Self {
        Self { p0, p1, p2 }
    }

    /// The three corners in order.
    #[inline]
    pub fn corners(&self) -> [&Corner; 3] {
        [&self.p0, &self.p1, &self.p2]
    }
}

/// Decompose a polygon loop into triangles.
///
/// Consecutive duplicate corners (by local index, cyclically) are
/// removed first. An empty result means the loop cannot be
/// triangulated: fewer than three distinct corners, a degenerate
/// (zero-normal) loop, or an ear search that exhausts its candidates.
/// Partial decompositions are never returned: a successful run over an
/// n-corner simple polygon yields exactly n - 2 triangles.
pub fn triangulate(mut polygon: Vec<Corner>) -> Vec<Triangle> {
    dedup_consecutive(&mut polygon);

    if polygon.len() < 3 {
        return Vec::new();
    }

    // FAST PATH: already a triangle, no orientation work needed.
    if polygon.len() == 3 {
        return vec![Triangle::new(polygon[0], polygon[1], polygon[2])];
    }

    let normal = newell_normal(&polygon);

    // A zero normal means the loop is collinear or coincident; a fan
    // over it would only produce zero-area triangles.
    if normal == Vector3::zeros() {
        return Vec::new();
    }

    if is_convex(&polygon, &normal) {
        fan_triangulation(&polygon)
    } else {
        cut_triangulation(polygon, &normal)
    }
}

/// Fan decomposition from the first corner, valid for convex loops.
fn fan_triangulation(polygon: &[Corner]) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(polygon.len() - 2);

    for i in 1..polygon.len() - 1 {
        triangles.push(Triangle::new(polygon[0], polygon[i], polygon[i + 1]));
    }

    triangles
}

/// Iterative ear clipping for concave and irregular loops.
fn cut_triangulation(mut polygon: Vec<Corner>, normal: &Vector3<f32>) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(polygon.len() - 2);

    // The ear tests assume a clockwise winding sense.
    make_clockwise(&mut polygon, normal);

    while polygon.len() >= 3 {
        let ear = find_biggest_ear(&polygon, normal)
            .or_else(|| find_overlapping_ear(&polygon, normal));

        let Some(index) = ear else {
            // Unresolvable self-intersection or degeneracy.
            return Vec::new();
        };

        let n = polygon.len();
        let prev = polygon[(index + n - 1) % n];
        let item = polygon[index];
        let next = polygon[(index + 1) % n];

        triangles.push(Triangle::new(prev, item, next));
        polygon.remove(index);
    }

    // Exactly two corners must survive the final cut; anything else
    // means the search accepted an invalid ear, and the whole result is
    // discarded rather than returned partial.
    if polygon.len() == 2 {
        triangles
    } else {
        Vec::new()
    }
}

/// True when the corner at `index` is a valid ear: a right turn whose
/// triangle holds no other corner, boundary contact included.
fn is_ear(index: usize, polygon: &[Corner], normal: &Vector3<f32>) -> bool {
    let n = polygon.len();

    if n < 3 {
        return false;
    }

    if n == 3 {
        return true;
    }

    let prev_index = (index + n - 1) % n;
    let next_index = (index + 1) % n;

    let prev = &polygon[prev_index];
    let item = &polygon[index];
    let next = &polygon[next_index];

    let u = normalize_or_zero(&(item.position - prev.position));

    if turn(&prev.position, &u, normal, &next.position) != TurnDirection::Right {
        return false;
    }

    for (i, other) in polygon.iter().enumerate() {
        if i == prev_index || i == index || i == next_index {
            continue;
        }

        let hit = point_in_triangle(&prev.position, &item.position, &next.position, &other.position);
        if hit.inside || hit.on_edge {
            return false;
        }
    }

    true
}

/// The valid ear of maximum squared area; first occurrence wins ties.
fn find_biggest_ear(polygon: &[Corner], normal: &Vector3<f32>) -> Option<usize> {
    let n = polygon.len();

    if n == 0 {
        return None;
    }

    if n == 3 {
        return Some(0);
    }

    let mut best: Option<(usize, f64)> = None;

    for index in 0..n {
        if !is_ear(index, polygon, normal) {
            continue;
        }

        let prev = &polygon[(index + n - 1) % n];
        let item = &polygon[index];
        let next = &polygon[(index + 1) % n];

        let area = triangle_area_squared(&prev.position, &item.position, &next.position);

        if best.map_or(true, |(_, max)| area > max) {
            best = Some((index, area));
        }
    }

    best.map(|(index, _)| index)
}

/// First corner whose edges fold straight back on themselves: a
/// zero-area spike the convexity-based ear test can never select.
fn find_overlapping_ear(polygon: &[Corner], normal: &Vector3<f32>) -> Option<usize> {
    let n = polygon.len();

    if n == 0 {
        return None;
    }

    if n == 3 {
        return Some(0);
    }

    for index in 0..n {
        let prev = &polygon[(index + n - 1) % n];
        let item = &polygon[index];
        let next = &polygon[(index + 1) % n];

        let u = normalize_or_zero(&(item.position - prev.position));

        if turn(&prev.position, &u, normal, &next.position) != TurnDirection::NoTurn {
            continue;
        }

        let v = normalize_or_zero(&(next.position - item.position));

        // Anti-parallel in/out directions mark the spike tip.
        if dot64(&u, &v) < 0.0 {
            return Some(index);
        }
    }

    None
}
