// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting an OBJ stream
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A vertex or face record could not be parsed
    #[error("line {line}: malformed record: {message}")]
    Format {
        /// 1-based line number in the source file.
        line: u64,
        /// What was wrong with the record.
        message: String,
    },

    /// The source has no convertible geometry: no vertices, or no face
    /// with more than three corners
    #[error("source has no polygons to triangulate")]
    NotTriangulatable,

    /// A polygon's ear search exhausted all candidates
    #[error("line {line}: face cannot be triangulated (degenerate geometry)")]
    DegenerateFace {
        /// 1-based line number in the source file.
        line: u64,
    },
}
