// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! OBJ record lexing.
//!
//! Works on raw bytes; only the tokens that drive conversion are parsed,
//! everything else passes through verbatim. All parse state is local to
//! each call.

use memchr::memchr;
use objtri_geometry::Point3;
use smallvec::SmallVec;

/// One face corner: the full token text (preserved verbatim in output,
/// including any `/vt/vn` attribute suffix) and its parsed leading
/// vertex index.
#[derive(Debug, Clone, Copy)]
pub struct FaceCorner<'a> {
    /// The whole corner token as it appeared in the source.
    pub text: &'a [u8],
    /// The leading vertex index, still unresolved: positive values are
    /// 1-based absolute, non-positive are relative to the table end.
    pub index: i64,
}

#[inline]
fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == 0x0b
}

#[inline]
fn is_trimmable(b: u8) -> bool {
    is_space(b) || b == b'\r' || b == b'\n'
}

/// Strip ASCII whitespace and line terminators from both ends.
pub fn trim(line: &[u8]) -> &[u8] {
    let start = line.iter().position(|&b| !is_trimmable(b)).unwrap_or(line.len());
    let end = line.iter().rposition(|&b| !is_trimmable(b)).map_or(start, |p| p + 1);
    &line[start..end]
}

/// True for a trimmed `v x y z ...` vertex position record.
///
/// `vt`/`vn`/`vp` records have no separator after the `v` and fall
/// through to pass-through handling.
#[inline]
pub fn is_vertex_line(line: &[u8]) -> bool {
    line.len() >= 2 && line[0] == b'v' && is_space(line[1])
}

/// True for a trimmed `f c1 c2 ...` face record.
#[inline]
pub fn is_face_line(line: &[u8]) -> bool {
    line.len() >= 2 && line[0] == b'f' && is_space(line[1])
}

/// Parse the three coordinates of a trimmed vertex record.
///
/// Trailing tokens (a `w` coordinate, vertex colors) are ignored.
pub fn parse_vertex(line: &[u8]) -> Option<Point3<f32>> {
    let mut rest = &line[1..];
    let mut coords = [0.0f32; 3];

    for coord in &mut coords {
        while rest.first().copied().is_some_and(is_space) {
            rest = &rest[1..];
        }
        let (value, consumed) = fast_float::parse_partial::<f32, _>(rest).ok()?;
        *coord = value;
        rest = &rest[consumed..];
    }

    Some(Point3::new(coords[0], coords[1], coords[2]))
}

/// Split a trimmed face record into corner tokens.
///
/// Returns `None` when any corner lacks a parseable leading index.
pub fn parse_face(line: &[u8]) -> Option<SmallVec<[FaceCorner<'_>; 8]>> {
    let mut corners = SmallVec::new();

    for token in line[1..].split(|&b| is_space(b)) {
        if token.is_empty() {
            continue;
        }

        let lead = match memchr(b'/', token) {
            Some(pos) => &token[..pos],
            None => token,
        };

        corners.push(FaceCorner {
            text: token,
            index: parse_index(lead)?,
        });
    }

    Some(corners)
}

/// Parse a complete signed decimal integer.
fn parse_index(bytes: &[u8]) -> Option<i64> {
    let (negative, digits) = match bytes.first()? {
        b'-' => (true, &bytes[1..]),
        b'+' => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    if digits.is_empty() {
        return None;
    }

    let mut value: i64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
    }

    Some(if negative { -value } else { value })
}

/// Resolve a face index against the vertex table.
///
/// Positive values are 1-based absolute positions; zero and negative
/// values count back from the table end. Out-of-range references
/// resolve to `None`.
#[inline]
pub fn resolve_index(raw: i64, table_len: usize) -> Option<usize> {
    let resolved = if raw > 0 {
        raw - 1
    } else {
        raw + table_len as i64
    };

    if resolved >= 0 && (resolved as usize) < table_len {
        Some(resolved as usize)
    } else {
        None
    }
}
