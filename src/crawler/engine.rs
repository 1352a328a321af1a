//! Traversal engine - the depth-first walk
//!
//! This module contains the walk that feeds directories and files to the
//! client hooks, including:
//! - Hidden-entry and predicate skip policy
//! - Deduplication against the frontier's identity set
//! - The inter-file delay
//! - Cancellation between node visits and periodic checkpoints
//!
//! The walk is pre-order and uses an explicit stack, so deep trees do not
//! grow the call stack. Symbolic links are followed and link cycles are not
//! detected.

use crate::config::{CrawlConfig, StorageErrorPolicy};
use crate::crawler::cancel::CancelToken;
use crate::crawler::hooks::CrawlHooks;
use crate::crawler::views::{DirView, FileView};
use crate::path::{absolute, is_hidden};
use crate::state::{FileIdentity, Frontier};
use crate::Result;
use std::fs::FileType;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Knobs the engine takes from the configuration
#[derive(Debug, Clone)]
pub struct TraversalSettings {
    /// Descend into hidden directories and process hidden files
    ///
    /// The crawl root itself is always descended into, even when its own
    /// name is hidden.
    pub crawl_hidden: bool,

    /// Wait before handling each not-yet-seen file
    pub delay: Duration,

    /// Count files rejected by `should_process_file` as skipped
    pub count_rejected_as_skipped: bool,

    /// Checkpoint after this many files processed in this run (0 disables)
    pub checkpoint_interval: u64,

    /// Policy for failed periodic checkpoints
    pub on_storage_error: StorageErrorPolicy,
}

impl TraversalSettings {
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            crawl_hidden: config.crawl.hidden_files,
            delay: config.delay(),
            count_rejected_as_skipped: config.crawl.count_rejected_as_skipped,
            checkpoint_interval: config.storage.checkpoint_interval,
            on_storage_error: config.storage.on_error,
        }
    }
}

impl Default for TraversalSettings {
    fn default() -> Self {
        Self {
            crawl_hidden: false,
            delay: Duration::ZERO,
            count_rejected_as_skipped: false,
            checkpoint_interval: 0,
            on_storage_error: StorageErrorPolicy::Abort,
        }
    }
}

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Every reachable node was visited
    Completed,
    /// The cancel token was set before the tree was exhausted
    Cancelled,
}

/// Summary of one walk
#[derive(Debug, Clone)]
pub struct WalkReport {
    pub outcome: WalkOutcome,

    /// Files handed to `on_process_file` during this walk
    pub files_processed: u64,

    pub elapsed: Duration,
}

/// A node waiting on the stack, with the entry type seen at listing time
struct Pending {
    path: PathBuf,
    depth: u32,
    listed_as: Option<FileType>,
}

/// Depth-first walker bound to a frontier and a set of hooks
pub struct TraversalEngine<'a, H: CrawlHooks> {
    root: PathBuf,
    frontier: &'a mut Frontier,
    hooks: &'a mut H,
    settings: TraversalSettings,
    cancel: CancelToken,
    processed_this_run: u64,
}

impl<'a, H: CrawlHooks> TraversalEngine<'a, H> {
    /// Creates an engine for the tree at `root`
    pub fn new(
        root: impl AsRef<Path>,
        frontier: &'a mut Frontier,
        hooks: &'a mut H,
        settings: TraversalSettings,
    ) -> Self {
        Self {
            root: absolute(root.as_ref()),
            frontier,
            hooks,
            settings,
            cancel: CancelToken::new(),
            processed_this_run: 0,
        }
    }

    /// Uses `cancel` instead of a private token
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs the lifecycle hooks around a full walk
    ///
    /// Marks the frontier finished when the walk completes. Only a failed
    /// periodic checkpoint under the abort policy returns an error; traversal
    /// I/O failures are logged and counted as skips.
    pub fn run(&mut self) -> Result<WalkReport> {
        let start_time = Instant::now();
        self.processed_this_run = 0;

        self.hooks.on_crawl_start();
        tracing::info!(
            "Crawling: {}",
            crate::path::root_display_name(&self.root.to_string_lossy())
        );

        let walked = self.walk();
        self.hooks.on_crawl_end();
        let outcome = walked?;

        match outcome {
            WalkOutcome::Completed => {
                if !self.frontier.is_finished() {
                    self.frontier.finish();
                }
                tracing::info!(
                    "Crawler is done: {} files processed in {:?}",
                    self.processed_this_run,
                    start_time.elapsed()
                );
            }
            WalkOutcome::Cancelled => {
                tracing::info!(
                    "Crawl cancelled after {} files processed",
                    self.processed_this_run
                );
            }
        }

        Ok(WalkReport {
            outcome,
            files_processed: self.processed_this_run,
            elapsed: start_time.elapsed(),
        })
    }

    fn walk(&mut self) -> Result<WalkOutcome> {
        let mut stack = vec![Pending {
            path: self.root.clone(),
            depth: 0,
            listed_as: None,
        }];

        while let Some(Pending {
            path,
            depth,
            listed_as,
        }) = stack.pop()
        {
            if self.cancel.is_cancelled() {
                return Ok(WalkOutcome::Cancelled);
            }

            self.frontier.record_max_depth(depth);

            let metadata = match std::fs::metadata(&path) {
                Ok(m) => m,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    // Dangling link or removed since listing
                    tracing::debug!("Ignoring {}: {}", path.display(), e);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Cannot read {}: {}", path.display(), e);
                    if listed_as.map_or(depth == 0, |t| t.is_dir()) {
                        self.frontier.mark_skipped_dir();
                    } else {
                        self.frontier.mark_skipped_file();
                    }
                    continue;
                }
            };

            if metadata.is_dir() {
                self.visit_dir(&path, depth, &mut stack);
            } else if metadata.is_file() {
                self.visit_file(&path, depth)?;
            } else {
                tracing::debug!("Ignoring special file {}", path.display());
            }
        }

        Ok(WalkOutcome::Completed)
    }

    /// Visits a directory and pushes its children for later visits
    fn visit_dir(&mut self, path: &Path, depth: u32, stack: &mut Vec<Pending>) {
        let hidden = is_hidden(path);

        // The root is crawled even when its own name is hidden
        if hidden && depth > 0 && !self.settings.crawl_hidden {
            tracing::debug!("Skipping hidden directory {}", path.display());
            self.frontier.mark_skipped_dir();
            return;
        }

        if !self.hooks.should_visit_dir(path, depth) {
            tracing::debug!("Skipping directory {}", path.display());
            self.frontier.mark_skipped_dir();
            return;
        }

        self.hooks
            .on_visit_dir(&DirView::new(path, &self.root, depth, hidden));
        self.frontier.mark_visited_dir();

        let entries = match std::fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Cannot list directory {}: {}", path.display(), e);
                self.frontier.mark_skipped_dir();
                return;
            }
        };

        let mut children = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => children.push(Pending {
                    path: entry.path(),
                    depth: depth + 1,
                    listed_as: entry.file_type().ok(),
                }),
                Err(e) => tracing::warn!("Cannot read entry in {}: {}", path.display(), e),
            }
        }

        // Reversed so the first child is popped first
        stack.extend(children.into_iter().rev());
    }

    /// Handles a regular file unless it has been seen before
    fn visit_file(&mut self, path: &Path, depth: u32) -> Result<()> {
        let id = FileIdentity::derive(path, self.frontier.identity_strategy());
        if self.frontier.seen(&id) {
            tracing::trace!("Already seen {}", path.display());
            return Ok(());
        }

        if !self.settings.delay.is_zero() {
            std::thread::sleep(self.settings.delay);
        }

        let hidden = is_hidden(path);

        if hidden && !self.settings.crawl_hidden {
            tracing::debug!("Skipping hidden file {}", path.display());
            self.frontier.mark_skipped_file();
            self.frontier.mark_seen(id);
            return Ok(());
        }

        if !self.hooks.should_process_file(path, depth) {
            tracing::debug!("Not processing {}", path.display());
            if self.settings.count_rejected_as_skipped {
                self.frontier.mark_skipped_file();
            }
            self.frontier.mark_seen(id);
            return Ok(());
        }

        self.hooks
            .on_process_file(&FileView::new(path, &self.root, depth, hidden));
        self.frontier.mark_processed_file();
        self.frontier.mark_seen(id);
        self.processed_this_run += 1;

        let interval = self.settings.checkpoint_interval;
        if interval > 0 && self.processed_this_run % interval == 0 {
            self.frontier.sync(self.settings.on_storage_error)?;
        }

        Ok(())
    }
}
