// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Post-conversion console report.
//!
//! Formatting only; nothing here affects conversion correctness.

use std::fs;
use std::path::Path;
use std::time::Duration;

use objtri_core::Metrics;

const INDENT: &str = "     ";
const RULE_WIDTH: usize = 50;

/// Print the face-metrics block for a finished conversion. Skipped when
/// the source had no geometry.
pub fn print(source: &Path, target: &Path, metrics: &Metrics, elapsed: Duration) {
    if metrics.is_empty() {
        return;
    }

    let rule = "-".repeat(RULE_WIDTH);
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    println!("{INDENT}");
    println!("{INDENT}{rule}");
    println!("{INDENT}{name} {}", target_size(target));
    println!("{INDENT}{rule}");
    println!("{INDENT}Face metrics");
    println!("{INDENT}{rule}");
    println!(
        "{INDENT}Polygons triangulated : {}",
        group_thousands(metrics.polygons_expanded)
    );
    println!(
        "{INDENT}Existing triangles    : {}",
        group_thousands(metrics.triangles_existing)
    );
    println!(
        "{INDENT}Created triangles     : {}  {}",
        group_thousands(metrics.triangles_created),
        size_delta(source, target)
    );
    println!("{INDENT}{rule}");
    println!(
        "{INDENT}Total triangles       : {}",
        group_thousands(metrics.total_triangles())
    );
    println!(
        "{INDENT}Total vertices        : {}",
        group_thousands(metrics.vertices)
    );
    println!("{INDENT}{rule}");
    println!("{INDENT}Execution time        : {}", format_duration(elapsed));
    println!("{INDENT}{rule}");
    println!();
}

/// Group digits in threes with `.` separators.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }

    out
}

/// Humanize a byte count in 1024 steps, no decimals.
fn byte_text(bytes: u64) -> String {
    const UNITS: [&str; 5] = [" bytes", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.0}{}", size, UNITS[unit])
}

fn target_size(target: &Path) -> String {
    fs::metadata(target)
        .map(|m| byte_text(m.len()))
        .unwrap_or_default()
}

/// Signed size difference between source and target, empty when equal
/// or unknown.
fn size_delta(source: &Path, target: &Path) -> String {
    let (Ok(source_meta), Ok(target_meta)) = (fs::metadata(source), fs::metadata(target)) else {
        return String::new();
    };

    let from = source_meta.len();
    let to = target_meta.len();

    match to.cmp(&from) {
        std::cmp::Ordering::Equal => String::new(),
        std::cmp::Ordering::Greater => format!("+{}", byte_text(to - from)),
        std::cmp::Ordering::Less => format!("-{}", byte_text(from - to)),
    }
}

/// `hh:mm:ss` above a minute, otherwise the largest sub-minute unit.
fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();

    if secs >= 60 {
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs > 0 {
        format!("{secs} seconds")
    } else if elapsed.as_millis() > 0 {
        format!("{} milliseconds", elapsed.as_millis())
    } else {
        format!("{} microseconds", elapsed.as_micros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1.000");
        assert_eq!(group_thousands(1234567), "1.234.567");
    }

    #[test]
    fn test_byte_text_units() {
        assert_eq!(byte_text(0), "0 bytes");
        assert_eq!(byte_text(512), "512 bytes");
        assert_eq!(byte_text(2048), "2KB");
        assert_eq!(byte_text(5 * 1024 * 1024), "5MB");
        assert_eq!(byte_text(3 * 1024 * 1024 * 1024), "3GB");
    }

    #[test]
    fn test_format_duration_buckets() {
        assert_eq!(format_duration(Duration::from_micros(250)), "250 microseconds");
        assert_eq!(format_duration(Duration::from_millis(40)), "40 milliseconds");
        assert_eq!(format_duration(Duration::from_secs(5)), "5 seconds");
        assert_eq!(format_duration(Duration::from_secs(3723)), "01:02:03");
    }
}
