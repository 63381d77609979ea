// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Source and target path resolution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

/// Extension a source or target file must carry, lowercased.
const FILE_EXT: &str = "obj";

/// Label inserted into the default target name.
const FILE_LABEL: &str = "triangulated";

/// Lowercased extension without the dot, empty when absent.
fn ext(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Default target alongside the source: `<stem>.triangulated.obj`.
fn default_target(source: &Path) -> PathBuf {
    let mut name = OsString::from(source.file_stem().unwrap_or_default());
    name.push(".");
    name.push(FILE_LABEL);
    name.push(".");
    name.push(FILE_EXT);
    source.with_file_name(name)
}

/// The directory a path lives in, with `""` normalized to `.`.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Resolve the target path for a conversion, validating the source.
///
/// A directory target gets the source's filename, except the source's
/// own directory, which keeps the default name so the source is never
/// overwritten. A file target must carry the `.obj` extension and live
/// in an existing directory.
pub fn resolve(source: &Path, target: Option<&Path>) -> Result<PathBuf> {
    if !source.exists() {
        bail!("could not open the source file {}", source.display());
    }

    if ext(source) != FILE_EXT {
        bail!("source file is not an {FILE_EXT} file: {}", source.display());
    }

    let Some(path) = target else {
        return Ok(default_target(source));
    };

    if path.is_dir() {
        let same_dir = match (path.canonicalize(), parent_dir(source).canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };

        if same_dir {
            return Ok(default_target(source));
        }

        return Ok(path.join(source.file_name().unwrap_or_default()));
    }

    if ext(path).is_empty() {
        bail!("target directory is unknown: {}", path.display());
    }

    if ext(path) != FILE_EXT {
        bail!("target file is not an {FILE_EXT} file: {}", path.display());
    }

    if !parent_dir(path).is_dir() {
        bail!("target file has unknown directory: {}", path.display());
    }

    Ok(path.to_path_buf())
}
