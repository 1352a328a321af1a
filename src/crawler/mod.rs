//! Crawler module for directory-tree traversal
//!
//! This module contains the core crawling logic, including:
//! - The depth-first traversal engine and its skip policy
//! - Client hooks and the read-only views passed to them
//! - Cancellation of a running walk
//! - Overall crawl control: storage folder, resume, shutdown

mod cancel;
mod controller;
mod engine;
mod hooks;
mod views;

pub use cancel::CancelToken;
pub use controller::{run_crawl, Controller};
pub use engine::{TraversalEngine, TraversalSettings, WalkOutcome, WalkReport};
pub use hooks::{CrawlHooks, DefaultHooks, FnHooks};
pub use views::{DirView, FileView};

use crate::config::CrawlConfig;
use crate::output::CrawlStatistics;
use crate::Result;

/// Runs a complete crawl with hooks that accept everything
///
/// This is the simplest entry point. It will:
/// 1. Prepare the storage folder and open the frontier
/// 2. Walk the tree, processing every unseen, non-hidden file
/// 3. Checkpoint and return the statistics
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl ran to completion or was cancelled
/// * `Err(BurrowError)` - Crawl could not start or a checkpoint failed
pub fn crawl(config: CrawlConfig) -> Result<CrawlStatistics> {
    run_crawl(config, &mut DefaultHooks)
}
