use crate::state::IdentityStrategy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cumulative statistics for one crawl storage folder
///
/// These survive across resumed runs: a resumed crawl keeps counting from the
/// persisted values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlCounters {
    /// Root the crawl was started on; fixed for the life of the folder
    pub root_path: String,

    /// Deepest node recorded so far
    pub max_depth_seen: Option<u32>,

    pub visited_dirs: u64,
    pub skipped_dirs: u64,
    pub processed_files: u64,
    pub skipped_files: u64,

    /// Set once a walk has covered the whole tree
    pub finished: bool,

    /// Strategy used for the identities persisted alongside these counters
    #[serde(default)]
    pub identity: IdentityStrategy,

    /// When this crawl folder was first populated
    pub started_at: DateTime<Utc>,

    /// When the counters were last checkpointed
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CrawlCounters {
    pub fn new(root_path: impl Into<String>, identity: IdentityStrategy) -> Self {
        Self {
            root_path: root_path.into(),
            max_depth_seen: None,
            visited_dirs: 0,
            skipped_dirs: 0,
            processed_files: 0,
            skipped_files: 0,
            finished: false,
            identity,
            started_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Raises the recorded maximum depth; never lowers it
    pub fn record_max_depth(&mut self, depth: u32) {
        self.max_depth_seen = Some(self.max_depth_seen.map_or(depth, |max| max.max(depth)));
    }

    /// Whether `root` names the same root as this crawl (case-insensitive)
    pub fn matches_root(&self, root: &str) -> bool {
        self.root_path.to_lowercase() == root.to_lowercase()
    }
}
