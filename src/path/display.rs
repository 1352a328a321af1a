//! Root display names and root-relative paths

use std::path::Path;

/// Derives a short display name for the crawl root
///
/// The root is split on `/` with trailing empty segments dropped. A single
/// segment is returned unchanged; otherwise the last segment is wrapped in
/// slashes.
///
/// # Examples
///
/// ```
/// use burrow::path::root_display_name;
///
/// assert_eq!(root_display_name("/home/user/photos/"), "/photos/");
/// assert_eq!(root_display_name("photos"), "photos");
/// ```
pub fn root_display_name(root: &str) -> String {
    let mut segments: Vec<&str> = root.split('/').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }

    match segments.as_slice() {
        [] | [_] => root.to_string(),
        [.., last] => format!("/{}/", last),
    }
}

/// Computes `path` relative to `root`, always starting with `/`
///
/// Paths outside the root are returned unchanged.
pub fn relative_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rest) => {
            let rest = rest.to_string_lossy();
            format!("/{}", rest)
        }
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display_name_nested() {
        assert_eq!(root_display_name("/home/user/photos/"), "/photos/");
        assert_eq!(root_display_name("/home/user/photos"), "/photos/");
        assert_eq!(root_display_name("a/b"), "/b/");
    }

    #[test]
    fn test_root_display_name_single_segment() {
        assert_eq!(root_display_name("photos"), "photos");
        assert_eq!(root_display_name("photos/"), "photos/");
    }

    #[test]
    fn test_root_display_name_filesystem_root() {
        assert_eq!(root_display_name("/"), "/");
        assert_eq!(root_display_name(""), "");
    }

    #[test]
    fn test_relative_path_strips_root() {
        let root = Path::new("/data/tree/");
        assert_eq!(
            relative_path(root, Path::new("/data/tree/a/b.txt")),
            "/a/b.txt"
        );
        assert_eq!(relative_path(root, Path::new("/data/tree/top.txt")), "/top.txt");
        assert_eq!(relative_path(root, Path::new("/data/tree")), "/");
    }

    #[test]
    fn test_relative_path_outside_root() {
        let root = Path::new("/data/tree/");
        assert_eq!(relative_path(root, Path::new("/other/x.txt")), "/other/x.txt");
    }
}
