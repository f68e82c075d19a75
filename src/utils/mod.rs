//! Utilities for path collection, output naming and size formatting.

use crate::{Result, error::PdfJoinError};
use std::path::PathBuf;

/// Characters that are not allowed in output file names.
const ILLEGAL_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Resolve glob patterns to paths, in pattern order.
///
/// A pattern without glob metacharacters that matches nothing is kept as a
/// literal path so that the caller reports it as missing instead of silently
/// dropping it.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        resolved_paths.extend(collect_paths_for_pattern(pattern.as_ref())?);
    }

    Ok(resolved_paths)
}

fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|err| PdfJoinError::Other {
        message: format!("Invalid pattern '{pattern}': {err}"),
    })?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| PdfJoinError::Other {
            message: err.to_string(),
        })?;
        resolved_paths.push(path);
    }
    resolved_paths.sort();

    if resolved_paths.is_empty() && !has_glob_meta(pattern) {
        resolved_paths.push(PathBuf::from(pattern));
    }

    Ok(resolved_paths)
}

fn has_glob_meta(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Turn a user-supplied name hint into a safe `.pdf` file name.
///
/// Blank hints fall back to `default`. Path separators and other characters
/// that are illegal in file names become `_`.
pub fn sanitize_output_name(hint: &str, default: &str) -> String {
    let base = if hint.trim().is_empty() { default } else { hint };
    let name = base.replace(ILLEGAL_NAME_CHARS, "_");
    let name = name.trim();

    if name.to_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{name}.pdf")
    }
}

/// Format a byte count for humans.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.2} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.2} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.2} KB", b as f64 / KB as f64),
        b => format!("{b} bytes"),
    }
}
