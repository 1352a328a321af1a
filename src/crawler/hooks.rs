//! Client hooks invoked by the traversal engine
//!
//! Implement [`CrawlHooks`] on your own type and override the methods you
//! need, or assemble an [`FnHooks`] from closures. Every hook has a
//! permissive default: visit everything, process everything, do nothing.

use crate::crawler::views::{DirView, FileView};
use std::path::Path;

/// Decision and visitation points of a crawl
pub trait CrawlHooks {
    /// Called once before the walk starts
    fn on_crawl_start(&mut self) {}

    /// Whether to descend into the directory at `path`
    fn should_visit_dir(&mut self, _path: &Path, _depth: u32) -> bool {
        true
    }

    /// Called for each directory that is descended into
    fn on_visit_dir(&mut self, _dir: &DirView<'_>) {}

    /// Whether to process the not-yet-seen file at `path`
    fn should_process_file(&mut self, _path: &Path, _depth: u32) -> bool {
        true
    }

    /// Called for each file that is processed
    fn on_process_file(&mut self, _file: &FileView<'_>) {}

    /// Called once after the walk, including after cancellation
    fn on_crawl_end(&mut self) {}
}

/// Hooks with every default in place
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl CrawlHooks for DefaultHooks {}

impl<H: CrawlHooks + ?Sized> CrawlHooks for &mut H {
    fn on_crawl_start(&mut self) {
        (**self).on_crawl_start()
    }

    fn should_visit_dir(&mut self, path: &Path, depth: u32) -> bool {
        (**self).should_visit_dir(path, depth)
    }

    fn on_visit_dir(&mut self, dir: &DirView<'_>) {
        (**self).on_visit_dir(dir)
    }

    fn should_process_file(&mut self, path: &Path, depth: u32) -> bool {
        (**self).should_process_file(path, depth)
    }

    fn on_process_file(&mut self, file: &FileView<'_>) {
        (**self).on_process_file(file)
    }

    fn on_crawl_end(&mut self) {
        (**self).on_crawl_end()
    }
}

type Predicate<'a> = Box<dyn FnMut(&Path, u32) -> bool + 'a>;
type DirCallback<'a> = Box<dyn FnMut(&DirView<'_>) + 'a>;
type FileCallback<'a> = Box<dyn FnMut(&FileView<'_>) + 'a>;
type Lifecycle<'a> = Box<dyn FnMut() + 'a>;

/// Hooks assembled from closures
///
/// # Example
///
/// ```
/// use burrow::crawler::FnHooks;
///
/// let mut processed = Vec::new();
/// let hooks = FnHooks::new()
///     .visit_dir_when(|_path, depth| depth < 3)
///     .for_each_file(|file| processed.push(file.relative_path()));
/// # drop(hooks);
/// ```
#[derive(Default)]
pub struct FnHooks<'a> {
    on_crawl_start: Option<Lifecycle<'a>>,
    should_visit_dir: Option<Predicate<'a>>,
    on_visit_dir: Option<DirCallback<'a>>,
    should_process_file: Option<Predicate<'a>>,
    on_process_file: Option<FileCallback<'a>>,
    on_crawl_end: Option<Lifecycle<'a>>,
}

impl<'a> FnHooks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, f: impl FnMut() + 'a) -> Self {
        self.on_crawl_start = Some(Box::new(f));
        self
    }

    pub fn visit_dir_when(mut self, f: impl FnMut(&Path, u32) -> bool + 'a) -> Self {
        self.should_visit_dir = Some(Box::new(f));
        self
    }

    pub fn for_each_dir(mut self, f: impl FnMut(&DirView<'_>) + 'a) -> Self {
        self.on_visit_dir = Some(Box::new(f));
        self
    }

    pub fn process_file_when(mut self, f: impl FnMut(&Path, u32) -> bool + 'a) -> Self {
        self.should_process_file = Some(Box::new(f));
        self
    }

    pub fn for_each_file(mut self, f: impl FnMut(&FileView<'_>) + 'a) -> Self {
        self.on_process_file = Some(Box::new(f));
        self
    }

    pub fn on_end(mut self, f: impl FnMut() + 'a) -> Self {
        self.on_crawl_end = Some(Box::new(f));
        self
    }
}

impl CrawlHooks for FnHooks<'_> {
    fn on_crawl_start(&mut self) {
        if let Some(f) = self.on_crawl_start.as_mut() {
            f();
        }
    }

    fn should_visit_dir(&mut self, path: &Path, depth: u32) -> bool {
        self.should_visit_dir
            .as_mut()
            .map_or(true, |f| f(path, depth))
    }

    fn on_visit_dir(&mut self, dir: &DirView<'_>) {
        if let Some(f) = self.on_visit_dir.as_mut() {
            f(dir);
        }
    }

    fn should_process_file(&mut self, path: &Path, depth: u32) -> bool {
        self.should_process_file
            .as_mut()
            .map_or(true, |f| f(path, depth))
    }

    fn on_process_file(&mut self, file: &FileView<'_>) {
        if let Some(f) = self.on_process_file.as_mut() {
            f(file);
        }
    }

    fn on_crawl_end(&mut self) {
        if let Some(f) = self.on_crawl_end.as_mut() {
            f();
        }
    }
}
