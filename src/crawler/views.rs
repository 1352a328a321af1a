//! Read-only views handed to visitation hooks
//!
//! A view is built for a single hook call and dropped when the hook returns.

use crate::path::{file_extension, relative_path};
use std::fs::{File, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// A directory being visited
#[derive(Debug, Clone, Copy)]
pub struct DirView<'a> {
    path: &'a Path,
    root: &'a Path,
    depth: u32,
    hidden: bool,
}

impl<'a> DirView<'a> {
    pub(crate) fn new(path: &'a Path, root: &'a Path, depth: u32, hidden: bool) -> Self {
        Self {
            path,
            root,
            depth,
            hidden,
        }
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// Final path component; empty for the filesystem root
    pub fn name(&self) -> String {
        file_name(self.path)
    }

    /// Depth below the crawl root; the root itself is 0
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn parent(&self) -> Option<&'a Path> {
        self.path.parent()
    }

    /// Path relative to the crawl root, starting with `/`
    pub fn relative_path(&self) -> String {
        relative_path(self.root, self.path)
    }

    /// Paths of the entries inside this directory, in filesystem order
    pub fn list(&self) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(self.path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    /// Number of entries inside this directory
    pub fn entry_count(&self) -> io::Result<usize> {
        Ok(std::fs::read_dir(self.path)?.count())
    }
}

/// A file about to be processed
#[derive(Debug, Clone, Copy)]
pub struct FileView<'a> {
    path: &'a Path,
    root: &'a Path,
    depth: u32,
    hidden: bool,
}

impl<'a> FileView<'a> {
    pub(crate) fn new(path: &'a Path, root: &'a Path, depth: u32, hidden: bool) -> Self {
        Self {
            path,
            root,
            depth,
            hidden,
        }
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }

    pub fn name(&self) -> String {
        file_name(self.path)
    }

    /// Parent directory depth plus one
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn parent(&self) -> Option<&'a Path> {
        self.path.parent()
    }

    pub fn relative_path(&self) -> String {
        relative_path(self.root, self.path)
    }

    /// Extension class, see [`file_extension`]
    pub fn extension(&self) -> String {
        file_extension(&self.name())
    }

    pub fn metadata(&self) -> io::Result<Metadata> {
        std::fs::metadata(self.path)
    }

    /// Opens the file for reading
    pub fn open(&self) -> io::Result<File> {
        File::open(self.path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
