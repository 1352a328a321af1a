//! Output module for crawl statistics
//!
//! This module handles:
//! - Snapshotting frontier counters into [`CrawlStatistics`]
//! - Printing the statistics block at shutdown or on `--stats`

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};
