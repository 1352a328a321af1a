//! File name classification

use std::path::Path;

/// Class reported for names starting with a dot
pub const HIDDEN_EXTENSION: &str = "hidden";

/// Class reported for names without any dot
pub const UNKNOWN_EXTENSION: &str = "unknown";

/// Classifies a file name by its extension
///
/// A leading dot yields `"hidden"`, a name without a dot yields `"unknown"`,
/// and anything else yields the lowercase substring from the last dot on.
///
/// # Examples
///
/// ```
/// use burrow::path::file_extension;
///
/// assert_eq!(file_extension(".env"), "hidden");
/// assert_eq!(file_extension("README"), "unknown");
/// assert_eq!(file_extension("archive.tar.gz"), ".gz");
/// ```
pub fn file_extension(name: &str) -> String {
    if name.starts_with('.') {
        return HIDDEN_EXTENSION.to_string();
    }

    match name.rfind('.') {
        Some(dot) => name[dot..].to_lowercase(),
        None => UNKNOWN_EXTENSION.to_string(),
    }
}

/// Whether a filesystem entry counts as hidden
///
/// Dot-prefixed names are hidden everywhere; on Windows the hidden
/// attribute is honored as well. Paths without a final name component (such
/// as `/` or `.`) are never hidden.
pub fn is_hidden(path: &Path) -> bool {
    let dot_named = path
        .file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false);

    dot_named || has_hidden_attribute(path)
}

#[cfg(windows)]
fn has_hidden_attribute(path: &Path) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    std::fs::metadata(path)
        .map(|meta| meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn has_hidden_attribute(_path: &Path) -> bool {
    false
}
