// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # objtri-geometry
//!
//! Polygon-to-triangle decomposition for OBJ conversion.
//!
//! Decomposes a planar (or near-planar) polygon loop into triangles that
//! exactly cover it. Convex loops take a fan fast path; everything else
//! goes through iterative ear clipping with a recovery step for
//! zero-area spikes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use objtri_geometry::{triangulate, Corner, Point3};
//!
//! let square = vec![
//!     Corner::new(0, Point3::new(0.0, 0.0, 0.0)),
//!     Corner::new(1, Point3::new(1.0, 0.0, 0.0)),
//!     Corner::new(2, Point3::new(1.0, 1.0, 0.0)),
//!     Corner::new(3, Point3::new(0.0, 1.0, 0.0)),
//! ];
//!
//! let triangles = triangulate(square);
//! assert_eq!(triangles.len(), 2);
//! ```
//!
//! An empty result means the loop cannot be triangulated; partial
//! decompositions are never returned.

pub mod math;
pub mod polygon;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use math::TurnDirection;
pub use polygon::{newell_normal, Corner};
pub use triangulation::{triangulate, Triangle};
