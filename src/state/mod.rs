//! State module for tracking crawl progress
//!
//! This module provides the state a crawl accumulates and checkpoints.
//!
//! # Components
//!
//! - `CrawlCounters`: cumulative statistics (depth, directories, files)
//! - `IdentitySet`: append-only record of files already handled
//! - `Frontier`: owns both and mediates loading, validation and checkpoints

mod counters;
mod frontier;
mod identity;

// Re-export main types
pub use counters::CrawlCounters;
pub use frontier::Frontier;
pub use identity::{path_hash, FileIdentity, IdentitySet, IdentityStrategy};
