//! Path handling module for Burrow
//!
//! Pure helpers used by the traversal engine and by hooks: short root display
//! names, root-relative paths, extension classification and hidden-entry
//! detection.

mod display;
mod extension;

// Re-export main functions
pub use display::{relative_path, root_display_name};
pub use extension::{file_extension, is_hidden, HIDDEN_EXTENSION, UNKNOWN_EXTENSION};

use std::path::{Path, PathBuf};

/// Makes `path` absolute against the current directory without touching the
/// filesystem, falling back to the path as given
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
