// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reserved output header.
//!
//! The header is written twice against the same handle: once with
//! zeroed counters before the body to reserve its bytes, once after the
//! streaming pass with the final counters. Every counter renders
//! right-aligned in a fixed width, so the second write is byte-for-byte
//! the same length and never shifts the body.

use std::io::{self, Write};

use crate::metrics::Metrics;

/// Field width that fits any `u64` counter.
const COUNTER_WIDTH: usize = 20;

/// Write the header comment block for `source_name` with `metrics`.
pub(crate) fn write_header<W: Write>(
    w: &mut W,
    source_name: &str,
    metrics: &Metrics,
) -> io::Result<()> {
    let width = COUNTER_WIDTH;

    writeln!(w, "# Triangulated Wavefront OBJ")?;
    writeln!(w, "#")?;
    writeln!(w, "# Source file : {source_name}")?;
    writeln!(w, "#   Vertices  : {:>width$}", metrics.vertices)?;
    writeln!(w, "#   Polygons  : {:>width$}", metrics.polygons_seen)?;
    writeln!(w, "#   Triangles : {:>width$}", metrics.triangles_existing)?;
    writeln!(w, "#")?;
    writeln!(w, "# This file")?;
    writeln!(w, "#   Polygons expanded : {:>width$}", metrics.polygons_expanded)?;
    writeln!(w, "#   Triangles created : {:>width$}", metrics.triangles_created)?;
    writeln!(w, "#")?;
    writeln!(
        w,
        "# Total triangles after triangulation : {:>width$}",
        metrics.total_triangles()
    )?;
    writeln!(w, "#")?;
    writeln!(
        w,
        "# Note: face and triangle counts quoted in comments carried over from"
    )?;
    writeln!(
        w,
        "# the source file refer to the original geometry and may be stale."
    )?;
    writeln!(w)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(metrics: &Metrics) -> Vec<u8> {
        let mut out = Vec::new();
        write_header(&mut out, "model.obj", metrics).unwrap();
        out
    }

    #[test]
    fn test_reserved_length_is_stable() {
        let placeholder = render(&Metrics::default());
        let finalized = render(&Metrics {
            vertices: u64::MAX,
            polygons_seen: u64::MAX,
            polygons_expanded: u64::MAX,
            triangles_existing: u64::MAX / 2,
            triangles_created: u64::MAX / 2,
        });

        // The placeholder must reserve exactly the bytes the final
        // header needs, for any counter value.
        assert_eq!(placeholder.len(), finalized.len());
    }

    #[test]
    fn test_header_is_comments_only() {
        let header = render(&Metrics::default());
        let text = String::from_utf8(header).unwrap();

        for line in text.lines() {
            assert!(line.is_empty() || line.starts_with('#'));
        }
    }
}
