//! Utility functions for logging, dates, and file system checks.
//!
//! This module provides helper functions used throughout the crate:
//! - String truncation for logging compiler diagnostics
//! - Today's date for issues that do not carry one
//! - Scratch directory naming
//! - File system validation for output directories

use chrono::Local;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a character
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Today's local date in `YYYY-MM-DD` format.
pub fn local_date() -> String {
    Local::now().date_naive().to_string()
}

/// Reduce an issue identifier to characters that are safe in a directory name.
///
/// Identifiers come from issue files and may contain separators or other
/// characters the temp-dir prefix cannot hold.
pub fn scratch_prefix(unique_id: &str) -> String {
    let id: String = unique_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(64)
        .collect();
    format!("mobi_periodical_{}_", id)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn ensure_writable_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)?;
    let probe_path = path.join("..__probe_write__");
    fs::File::create(&probe_path)?;
    let _ = fs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
