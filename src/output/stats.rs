//! Statistics snapshot of a crawl
//!
//! This module turns the frontier's counters into a plain value the
//! controller returns and, when configured, prints.

use crate::path::root_display_name;
use crate::state::{CrawlCounters, Frontier};
use std::fmt;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Root path as configured
    pub root_path: String,

    /// Short form of the root used in log lines
    pub display_name: String,

    /// Deepest depth reached so far, if anything was visited
    pub max_depth: Option<u32>,

    pub visited_dirs: u64,
    pub skipped_dirs: u64,

    /// Length of the recorded identity sequence, processed or not
    ///
    /// A persisted sequence may repeat an identity, so this can exceed the
    /// number of distinct files.
    pub seen_files: u64,

    pub processed_files: u64,
    pub skipped_files: u64,

    /// Whether a walk has ever completed over this root
    pub finished: bool,

    /// Whether this run continued persisted state
    pub resumed: bool,
}

impl CrawlStatistics {
    /// Builds statistics from persisted counters and an identity count
    pub fn from_counters(counters: &CrawlCounters, seen_files: usize) -> Self {
        Self {
            root_path: counters.root_path.clone(),
            display_name: root_display_name(&counters.root_path),
            max_depth: counters.max_depth_seen,
            visited_dirs: counters.visited_dirs,
            skipped_dirs: counters.skipped_dirs,
            seen_files: seen_files as u64,
            processed_files: counters.processed_files,
            skipped_files: counters.skipped_files,
            finished: counters.finished,
            resumed: false,
        }
    }

    /// Captures the current state of a frontier
    pub fn from_frontier(frontier: &Frontier) -> Self {
        Self {
            resumed: frontier.is_resumed(),
            ..Self::from_counters(frontier.counters(), frontier.seen_file_count())
        }
    }
}

impl fmt::Display for CrawlStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max_depth = self
            .max_depth
            .map_or_else(|| "-".to_string(), |d| d.to_string());

        writeln!(f, "=== Crawl Statistics ===")?;
        writeln!(f, "Root: {}", self.display_name)?;
        writeln!(f, "  Max depth detected: {}", max_depth)?;
        writeln!(f, "  Directories visited: {}", self.visited_dirs)?;
        writeln!(f, "  Directories skipped: {}", self.skipped_dirs)?;
        writeln!(f, "  Files seen: {}", self.seen_files)?;
        writeln!(f, "  Files processed: {}", self.processed_files)?;
        writeln!(f, "  Files skipped: {}", self.skipped_files)?;
        write!(
            f,
            "Status: {}{}",
            if self.finished { "finished" } else { "incomplete" },
            if self.resumed { " (resumed)" } else { "" }
        )
    }
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("{}", stats);
}
