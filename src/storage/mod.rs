//! Storage module for persisting crawl progress
//!
//! This module handles everything that touches the crawl storage folder:
//! - The `Storage` trait consumed by the frontier
//! - A JSON blob backend and a SQLite backend
//! - Clearing the folder before a non-resumable crawl

mod file;
mod schema;
mod sqlite;
mod traits;

pub use file::{FileStorage, COUNTERS_FILE, IDENTITIES_FILE};
pub use sqlite::{SqliteStorage, DATABASE_FILE};
pub use traits::{Storage, StorageError, StorageResult};

use crate::config::{CrawlConfig, StorageBackend};
use std::path::Path;

/// Opens the backend selected by the configuration
///
/// # Arguments
///
/// * `config` - The crawl configuration naming the folder and backend
///
/// # Returns
///
/// * `Ok(Box<dyn Storage>)` - Backend ready for loads and saves
/// * `Err(StorageError)` - The folder or database could not be opened
pub fn open_storage(config: &CrawlConfig) -> StorageResult<Box<dyn Storage>> {
    let folder = config.storage_folder();
    let storage: Box<dyn Storage> = match config.storage.backend {
        StorageBackend::File => Box::new(FileStorage::new(&folder)?),
        StorageBackend::Sqlite => Box::new(SqliteStorage::in_folder(&folder)?),
    };
    tracing::debug!(
        "Opened {} storage in {}",
        storage.name(),
        folder.display()
    );
    Ok(storage)
}

/// Whether the configured backend has anything stored in the folder
///
/// Only checks for the backend's files; nothing is created or opened.
pub fn has_stored_state(config: &CrawlConfig) -> bool {
    let folder = config.storage_folder();
    match config.storage.backend {
        StorageBackend::File => {
            folder.join(COUNTERS_FILE).is_file() || folder.join(IDENTITIES_FILE).is_file()
        }
        StorageBackend::Sqlite => folder.join(DATABASE_FILE).is_file(),
    }
}

/// Deletes everything inside `folder`, keeping the folder itself
///
/// A missing folder is not an error.
pub fn clear_folder(folder: &Path) -> StorageResult<()> {
    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            std::fs::remove_dir_all(&path)?;
        } else {
            std::fs::remove_file(&path)?;
        }
    }

    tracing::debug!("Cleared storage folder {}", folder.display());
    Ok(())
}
