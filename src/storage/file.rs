//! JSON file storage implementation
//!
//! Counters and identities live in two JSON blobs inside the storage folder.
//! Every save goes to a temporary file in the same folder which then replaces
//! the blob, so an interrupted save leaves the previous checkpoint intact.

use crate::state::{CrawlCounters, FileIdentity};
use crate::storage::traits::{Storage, StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Blob holding the counters
pub const COUNTERS_FILE: &str = "counters.json";

/// Blob holding the identity sequence
pub const IDENTITIES_FILE: &str = "identities.json";

/// Storage backend writing JSON blobs into a folder
pub struct FileStorage {
    folder: PathBuf,
}

impl FileStorage {
    /// Creates a backend rooted at `folder`, creating the folder if needed
    pub fn new(folder: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(folder)?;
        Ok(Self {
            folder: folder.to_path_buf(),
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn blob_path(&self, name: &str) -> PathBuf {
        self.folder.join(name)
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> StorageResult<Option<T>> {
        let file = match File::open(self.blob_path(name)) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(value))
    }

    fn save<T: Serialize + ?Sized>(&self, value: &T, name: &str) -> StorageResult<()> {
        let target = self.blob_path(name);
        let tmp = NamedTempFile::new_in(&self.folder)?;

        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(&mut writer, value)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;

        tmp.persist(&target).map_err(|e| StorageError::Persist {
            path: target.display().to_string(),
            source: e.error,
        })?;

        tracing::trace!("Wrote {}", target.display());
        Ok(())
    }
}

impl Storage for FileStorage {
    fn name(&self) -> &'static str {
        "file"
    }

    fn load_counters(&self) -> StorageResult<Option<CrawlCounters>> {
        self.load(COUNTERS_FILE)
    }

    fn save_counters(&mut self, counters: &CrawlCounters) -> StorageResult<()> {
        self.save(counters, COUNTERS_FILE)
    }

    fn load_identities(&self) -> StorageResult<Option<Vec<FileIdentity>>> {
        self.load(IDENTITIES_FILE)
    }

    fn save_identities(&mut self, identities: &[FileIdentity]) -> StorageResult<()> {
        self.save(identities, IDENTITIES_FILE)
    }
}
