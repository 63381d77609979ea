// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Streaming conversion pipeline.
//!
//! One validation pass to confirm the source has something to convert,
//! then one streaming pass that reads, transforms and writes each
//! record before advancing. The whole file is never held in memory; the
//! vertex table grows as `v` records arrive and face records resolve
//! against it.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use objtri_geometry::{triangulate, Corner, Point3};

use crate::error::{Error, Result};
use crate::header::write_header;
use crate::metrics::Metrics;
use crate::record;

/// What to do when a single record fails to parse or triangulate.
///
/// I/O failures and a source with nothing to convert are always fatal;
/// this policy only governs per-record trouble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Drop the offending record and continue the pass.
    #[default]
    Skip,
    /// Abort the whole conversion.
    Abort,
}

/// Conversion options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Policy for records that fail to parse or triangulate.
    pub failure_policy: FailurePolicy,
}

/// One-shot OBJ polygon-to-triangle converter.
///
/// Owns the vertex table and metrics for the duration of a single
/// conversion; calling [`convert`](Converter::convert) again resets
/// both.
#[derive(Debug, Default)]
pub struct Converter {
    options: ConvertOptions,
    metrics: Metrics,
    empty: bool,
}

impl Converter {
    /// Converter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter with explicit options.
    pub fn with_options(options: ConvertOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Counter snapshot of the last conversion.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// True when the last source had no convertible geometry.
    pub fn is_empty(&self) -> bool {
        self.empty || self.metrics.is_empty()
    }

    /// Convert `source` into `target`, rewriting every face with more
    /// than three corners as triangles.
    ///
    /// The target is created (truncated) up front and receives a
    /// reserved metrics header, the streamed body, then the finalized
    /// header in place. On a fatal error whatever was already flushed
    /// stays in the target file.
    pub fn convert(&mut self, source: &Path, target: &Path) -> Result<()> {
        self.metrics = Metrics::default();
        self.empty = false;

        let mut reader = BufReader::new(File::open(source)?);

        if !can_triangulate(&mut reader)? {
            self.empty = true;
            return Err(Error::NotTriangulatable);
        }

        reader.seek(SeekFrom::Start(0))?;

        let source_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut writer = BufWriter::new(File::create(target)?);

        // Header contract: reserve, stream the body, finalize in place.
        write_header(&mut writer, &source_name, &Metrics::default())?;
        self.rewrite(&mut reader, &mut writer)?;

        let mut file = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        file.seek(SeekFrom::Start(0))?;
        write_header(&mut file, &source_name, &self.metrics)?;

        info!(
            vertices = self.metrics.vertices,
            polygons = self.metrics.polygons_expanded,
            triangles_created = self.metrics.triangles_created,
            "conversion finished"
        );

        Ok(())
    }

    /// The streaming pass: classify each trimmed line, grow the vertex
    /// table, rewrite polygon faces, pass everything else through.
    fn rewrite<R: BufRead, W: Write>(&mut self, reader: &mut R, writer: &mut W) -> Result<()> {
        let mut vertices: Vec<Point3<f32>> = Vec::new();
        let mut line = Vec::with_capacity(256);
        let mut line_number: u64 = 0;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            line_number += 1;

            let trimmed = record::trim(&line);

            if record::is_vertex_line(trimmed) {
                match record::parse_vertex(trimmed) {
                    Some(position) => {
                        vertices.push(position);
                        self.metrics.vertices += 1;
                        writer.write_all(trimmed)?;
                        writer.write_all(b"\n")?;
                    }
                    None => self.record_failure(Error::Format {
                        line: line_number,
                        message: "vertex record is not three numeric coordinates".into(),
                    })?,
                }
            } else if record::is_face_line(trimmed) {
                self.rewrite_face(trimmed, &vertices, line_number, writer)?;
            } else {
                writer.write_all(trimmed)?;
                writer.write_all(b"\n")?;
            }
        }

        Ok(())
    }

    /// Rewrite one face record. Triangles pass through; polygons are
    /// resolved against the vertex table and expanded.
    fn rewrite_face<W: Write>(
        &mut self,
        line: &[u8],
        vertices: &[Point3<f32>],
        line_number: u64,
        writer: &mut W,
    ) -> Result<()> {
        let Some(face) = record::parse_face(line) else {
            return self.record_failure(Error::Format {
                line: line_number,
                message: "face corner without a leading vertex index".into(),
            });
        };

        if face.len() < 3 {
            return self.record_failure(Error::Format {
                line: line_number,
                message: format!("face with {} corners", face.len()),
            });
        }

        if face.len() == 3 {
            self.metrics.triangles_existing += 1;
            writer.write_all(line)?;
            writer.write_all(b"\n")?;
            return Ok(());
        }

        self.metrics.polygons_seen += 1;

        // Resolve corners against the vertex table. Corners referencing
        // the same table entry share one local index and keep the first
        // occurrence's token text, so attributes survive into every
        // triangle that reuses the corner.
        let mut local_of: FxHashMap<usize, usize> = FxHashMap::default();
        let mut tokens: SmallVec<[&[u8]; 8]> = SmallVec::new();
        let mut polygon: Vec<Corner> = Vec::with_capacity(face.len());

        for corner in &face {
            let Some(resolved) = record::resolve_index(corner.index, vertices.len()) else {
                return self.record_failure(Error::Format {
                    line: line_number,
                    message: format!("vertex index {} out of range", corner.index),
                });
            };

            let local = *local_of.entry(resolved).or_insert_with(|| {
                tokens.push(corner.text);
                tokens.len() - 1
            });

            polygon.push(Corner::new(local, vertices[resolved]));
        }

        let triangles = triangulate(polygon);

        if triangles.is_empty() {
            return self.record_failure(Error::DegenerateFace { line: line_number });
        }

        // Replacement text goes into a growable per-record buffer; the
        // expansion is always longer than the source line.
        let mut out = Vec::with_capacity(line.len() * 2);
        for triangle in &triangles {
            out.extend_from_slice(b"f");
            for corner in triangle.corners() {
                out.push(b' ');
                out.extend_from_slice(tokens[corner.index]);
            }
            out.push(b'\n');
        }
        writer.write_all(&out)?;

        self.metrics.polygons_expanded += 1;
        self.metrics.triangles_created += triangles.len() as u64;

        debug!(
            line = line_number,
            corners = face.len(),
            triangles = triangles.len(),
            "expanded polygon"
        );

        Ok(())
    }

    /// Apply the failure policy to a per-record error.
    fn record_failure(&self, error: Error) -> Result<()> {
        match self.options.failure_policy {
            FailurePolicy::Skip => {
                warn!("skipping record: {error}");
                Ok(())
            }
            FailurePolicy::Abort => Err(error),
        }
    }
}

/// Validation pass: the source must contain at least one vertex record
/// and one face with more than three corners.
fn can_triangulate<R: BufRead>(reader: &mut R) -> Result<bool> {
    let mut line = Vec::with_capacity(256);
    let mut has_vertex = false;
    let mut has_polygon = false;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        let trimmed = record::trim(&line);

        if !has_vertex && record::is_vertex_line(trimmed) {
            has_vertex = true;
        }

        if !has_polygon && record::is_face_line(trimmed) {
            if let Some(face) = record::parse_face(trimmed) {
                if face.len() > 3 {
                    has_polygon = true;
                }
            }
        }

        if has_vertex && has_polygon {
            return Ok(true);
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn convert_str(content: &str) -> (Converter, String) {
        convert_with(content, ConvertOptions::default()).expect("conversion failed")
    }

    fn convert_with(
        content: &str,
        options: ConvertOptions,
    ) -> Result<(Converter, String)> {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("model.obj");
        let target = dir.path().join("model.triangulated.obj");
        fs::write(&source, content).unwrap();

        let mut converter = Converter::with_options(options);
        converter.convert(&source, &target)?;

        let output = fs::read_to_string(&target).unwrap();
        Ok((converter, output))
    }

    fn face_lines(output: &str) -> Vec<&str> {
        output.lines().filter(|l| l.starts_with("f ")).collect()
    }

    const SQUARE_AND_TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0.5 1.5 0
v 0 1 0
f 1 2 3
f 1 2 3 4 5
";

    #[test]
    fn test_end_to_end_counters() {
        let (converter, output) = convert_str(SQUARE_AND_TRIANGLE);
        let metrics = converter.metrics();

        assert_eq!(metrics.vertices, 5);
        assert_eq!(metrics.triangles_existing, 1);
        assert_eq!(metrics.polygons_seen, 1);
        assert_eq!(metrics.polygons_expanded, 1);
        assert_eq!(metrics.triangles_created, 3);
        assert!(!converter.is_empty());

        // One original triangle plus three from the pentagon.
        assert_eq!(face_lines(&output).len(), 4);
        assert!(output.contains("f 1 2 3\n"));
    }

    #[test]
    fn test_header_is_finalized() {
        let (_, output) = convert_str(SQUARE_AND_TRIANGLE);

        assert!(output.starts_with("# Triangulated Wavefront OBJ"));

        let vertices_line = output
            .lines()
            .find(|l| l.starts_with("#   Vertices"))
            .unwrap();
        assert_eq!(vertices_line.split(':').nth(1).unwrap().trim(), "5");

        let total_line = output
            .lines()
            .find(|l| l.starts_with("# Total triangles"))
            .unwrap();
        assert_eq!(total_line.split(':').nth(1).unwrap().trim(), "4");
    }

    #[test]
    fn test_corner_attributes_survive() {
        let (_, output) = convert_str(
            "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1/10/1 2/20/2 3/30/3 4/40/4
",
        );

        let faces = face_lines(&output);
        assert_eq!(faces.len(), 2);

        for face in faces {
            for token in face.split_whitespace().skip(1) {
                assert!(
                    ["1/10/1", "2/20/2", "3/30/3", "4/40/4"].contains(&token),
                    "unexpected corner token {token}"
                );
            }
        }
    }

    #[test]
    fn test_relative_indices_resolve() {
        let (converter, output) = convert_str(
            "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f -4 -3 -2 -1
",
        );

        assert_eq!(converter.metrics().triangles_created, 2);

        // Tokens are preserved verbatim, still relative.
        let faces = face_lines(&output);
        assert_eq!(faces.len(), 2);
        assert!(faces.iter().all(|f| f.contains("-4") || f.contains("-3")));
    }

    #[test]
    fn test_repeated_corner_shares_first_token() {
        let (converter, output) = convert_str(
            "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1/1 2/2 2/9 3/3 4/4
",
        );

        // The duplicate collapses; a quad remains.
        assert_eq!(converter.metrics().triangles_created, 2);
        assert!(output.contains("2/2"));
        assert!(!output.contains("2/9"));
    }

    #[test]
    fn test_other_records_pass_through() {
        let (_, output) = convert_str(
            "\
# comment kept
mtllib scene.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0.5 0.5
usemtl stone
f 1 2 3 4
",
        );

        assert!(output.contains("# comment kept\n"));
        assert!(output.contains("mtllib scene.mtl\n"));
        assert!(output.contains("vt 0.5 0.5\n"));
        assert!(output.contains("usemtl stone\n"));
    }

    #[test]
    fn test_triangles_only_is_not_triangulatable() {
        let result = convert_with(
            "\
v 0 0 0
v 1 0 0
v 1 1 0
f 1 2 3
",
            ConvertOptions::default(),
        );

        assert!(matches!(result, Err(Error::NotTriangulatable)));
    }

    #[test]
    fn test_empty_flag_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("model.obj");
        let target = dir.path().join("out.obj");
        fs::write(&source, "# nothing here\n").unwrap();

        let mut converter = Converter::new();
        let result = converter.convert(&source, &target);

        assert!(matches!(result, Err(Error::NotTriangulatable)));
        assert!(converter.is_empty());
    }

    const DEGENERATE_AND_GOOD: &str = "\
v 0 0 0
v 1 0 0
v 2 0 0
v 3 0 0
v 0 1 0
v 1 1 0
v 1 2 0
v 0 2 0
f 1 2 3 4
f 5 6 7 8
";

    #[test]
    fn test_skip_policy_drops_degenerate_face() {
        let (converter, output) = convert_str(DEGENERATE_AND_GOOD);
        let metrics = converter.metrics();

        assert_eq!(metrics.polygons_seen, 2);
        assert_eq!(metrics.polygons_expanded, 1);
        assert_eq!(metrics.triangles_created, 2);

        // Only the healthy quad's triangles appear.
        assert_eq!(face_lines(&output).len(), 2);
    }

    #[test]
    fn test_abort_policy_escalates() {
        let result = convert_with(
            DEGENERATE_AND_GOOD,
            ConvertOptions {
                failure_policy: FailurePolicy::Abort,
            },
        );

        assert!(matches!(result, Err(Error::DegenerateFace { line: 9 })));
    }

    #[test]
    fn test_out_of_range_index_is_format_error() {
        let result = convert_with(
            "\
v 0 0 0
v 1 0 0
v 1 1 0
f 1 2 3 9
",
            ConvertOptions {
                failure_policy: FailurePolicy::Abort,
            },
        );

        assert!(matches!(result, Err(Error::Format { line: 4, .. })));
    }

    #[test]
    fn test_crlf_and_padding_tolerated() {
        let (converter, output) =
            convert_str("v 0 0 0\r\n  v 1 0 0\r\nv 1 1 0\r\nv 0 1 0\r\nf 1 2 3 4  \r\n");

        assert_eq!(converter.metrics().vertices, 4);
        assert_eq!(converter.metrics().triangles_created, 2);
        assert!(output.contains("v 1 0 0\n"));
    }
}
