use crate::state::IdentityStrategy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for Burrow
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    pub crawl: CrawlSettings,
    pub storage: StorageConfig,
}

/// Traversal behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// Directory where crawling begins; normalized to end with a separator
    pub root: String,

    /// Whether hidden directories are descended into and hidden files processed
    #[serde(rename = "hidden-files", default)]
    pub hidden_files: bool,

    /// How long to wait (in milliseconds) before handling a not-yet-seen file
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: i64,

    /// Print crawl statistics when finished
    #[serde(rename = "print-stats", default)]
    pub print_stats: bool,

    /// Count files rejected by `should_process_file` as skipped
    #[serde(rename = "count-rejected-as-skipped", default)]
    pub count_rejected_as_skipped: bool,

    /// How file identities are derived for deduplication
    #[serde(default)]
    pub identity: IdentityStrategy,
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Folder holding checkpoint data
    pub folder: String,

    /// Save progress so a later run can continue where this one left off
    #[serde(default)]
    pub resumable: bool,

    /// Which backend writes the checkpoint data
    #[serde(default)]
    pub backend: StorageBackend,

    /// Checkpoint after this many processed files (0 disables)
    #[serde(rename = "checkpoint-interval", default)]
    pub checkpoint_interval: u64,

    /// What to do when loading or saving checkpoint data fails
    #[serde(rename = "on-error", default)]
    pub on_error: StorageErrorPolicy,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    /// JSON blobs in the storage folder
    #[default]
    File,
    /// A SQLite database in the storage folder
    Sqlite,
}

/// Reaction to a failed load or save against storage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageErrorPolicy {
    /// Propagate the error and stop
    #[default]
    Abort,
    /// Log it and carry on without persistence
    Continue,
}

fn default_delay_ms() -> i64 {
    100
}

impl CrawlConfig {
    /// Builds a config for `root` with every optional setting at its default
    pub fn new(root: impl Into<String>, storage_folder: impl Into<String>) -> Self {
        Self {
            crawl: CrawlSettings {
                root: root.into(),
                hidden_files: false,
                delay_ms: default_delay_ms(),
                print_stats: false,
                count_rejected_as_skipped: false,
                identity: IdentityStrategy::default(),
            },
            storage: StorageConfig {
                folder: storage_folder.into(),
                resumable: false,
                backend: StorageBackend::default(),
                checkpoint_interval: 0,
                on_error: StorageErrorPolicy::default(),
            },
        }
    }

    pub fn root_path(&self) -> &Path {
        Path::new(&self.crawl.root)
    }

    pub fn storage_folder(&self) -> PathBuf {
        PathBuf::from(&self.storage.folder)
    }

    /// Inter-file delay; negative values are rejected by validation
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.crawl.delay_ms.max(0) as u64)
    }

    pub fn is_resumable(&self) -> bool {
        self.storage.resumable
    }
}
