// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # objtri-core
//!
//! Streaming conversion of Wavefront OBJ polygon meshes into
//! triangle-only meshes.
//!
//! ## Overview
//!
//! The converter makes two passes over the source file:
//!
//! - **Validation**: scan for at least one vertex record and one face
//!   with more than three corners; anything else has nothing to convert.
//! - **Rewrite**: stream the file record by record, growing the vertex
//!   table from `v` lines, expanding every face with more than three
//!   corners through the [`objtri_geometry`] ear-clipping engine, and
//!   passing everything else through untouched.
//!
//! The output starts with a reserved comment header that is rewritten in
//! place once the final counters are known (fixed-width fields, so the
//! rewrite never shifts the body).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use objtri_core::Converter;
//!
//! let mut converter = Converter::new();
//! converter.convert("model.obj".as_ref(), "model.triangulated.obj".as_ref())?;
//!
//! let metrics = converter.metrics();
//! println!("created {} triangles", metrics.triangles_created);
//! ```
//!
//! Per-record failures follow a configurable [`FailurePolicy`]; the
//! default drops the offending record and continues.

pub mod convert;
pub mod error;
pub mod metrics;
pub mod record;

mod header;

pub use convert::{ConvertOptions, Converter, FailurePolicy};
pub use error::{Error, Result};
pub use metrics::Metrics;
