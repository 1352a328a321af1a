//! Storage traits and error types
//!
//! This module defines the trait interface for checkpoint backends and
//! associated error types.

use crate::state::{CrawlCounters, FileIdentity};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },

    #[error("Corrupt checkpoint data: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for checkpoint backends
///
/// A backend holds at most one counters record and one identity sequence.
/// `None` from a load means nothing has been saved yet. Saves replace the
/// previous state atomically: a reader sees either the old or the new state,
/// never a mix.
pub trait Storage: Send {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Loads the persisted counters, if any
    fn load_counters(&self) -> StorageResult<Option<CrawlCounters>>;

    /// Replaces the persisted counters
    fn save_counters(&mut self, counters: &CrawlCounters) -> StorageResult<()>;

    /// Loads the persisted identity sequence, if any
    fn load_identities(&self) -> StorageResult<Option<Vec<FileIdentity>>>;

    /// Replaces the persisted identity sequence
    ///
    /// The sequence only ever grows, so backends may write just the tail
    /// beyond what they already hold.
    fn save_identities(&mut self, identities: &[FileIdentity]) -> StorageResult<()>;
}
