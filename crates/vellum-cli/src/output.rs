//! Output path resolution.

use std::path::{Path, PathBuf};

use time::{OffsetDateTime, macros::format_description};

/// File name used when exporting into a directory, e.g.
/// `mermaid-diagram-2024-03-09T14-05-00.svg`.
///
/// # Errors
///
/// Returns an error if `at` cannot be formatted.
pub fn export_file_name(at: OffsetDateTime) -> Result<String, time::error::Format> {
    let format = format_description!("[year]-[month]-[day]T[hour]-[minute]-[second]");
    Ok(format!("mermaid-diagram-{}.svg", at.format(format)?))
}

/// Where to write the SVG for `output`.
///
/// An existing directory receives a timestamped file; anything else is used
/// as the file path itself.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn resolve_output(output: &Path, at: OffsetDateTime) -> Result<PathBuf, time::error::Format> {
    if output.is_dir() {
        Ok(output.join(export_file_name(at)?))
    } else {
        Ok(output.to_path_buf())
    }
}
