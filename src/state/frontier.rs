use crate::config::{CrawlConfig, StorageErrorPolicy};
use crate::state::{CrawlCounters, FileIdentity, IdentitySet, IdentityStrategy};
use crate::storage::{open_storage, Storage, StorageError};
use crate::{BurrowError, Result};
use chrono::Utc;

/// Cumulative crawl progress plus the storage it is checkpointed to
///
/// The frontier owns the counters and the set of handled file identities.
/// It is created once per run, handed to the traversal engine by mutable
/// borrow, and checkpointed at points the controller chooses.
pub struct Frontier {
    counters: CrawlCounters,
    identities: IdentitySet,
    strategy: IdentityStrategy,
    resumed: bool,
    storage: Option<Box<dyn Storage>>,
}

impl Frontier {
    /// Builds a frontier that never touches storage
    pub fn in_memory(root: impl Into<String>, strategy: IdentityStrategy) -> Self {
        Self {
            counters: CrawlCounters::new(root, strategy),
            identities: IdentitySet::new(),
            strategy,
            resumed: false,
            storage: None,
        }
    }

    /// Opens the frontier for a run
    ///
    /// A resumable configuration loads any state persisted in the storage
    /// folder; otherwise the frontier starts empty and is never saved.
    /// Storage failures honor `storage.on-error`; a root or identity
    /// mismatch is always fatal.
    pub fn open(config: &CrawlConfig) -> Result<Self> {
        if !config.is_resumable() {
            return Ok(Self::in_memory(&config.crawl.root, config.crawl.identity));
        }

        let opened = open_storage(config)
            .map_err(BurrowError::from)
            .and_then(|storage| Self::with_storage(config, storage));

        match opened {
            Err(BurrowError::Storage(e))
                if config.storage.on_error == StorageErrorPolicy::Continue =>
            {
                tracing::warn!(
                    "Could not load crawl storage ({}); continuing without persistence",
                    e
                );
                Ok(Self::in_memory(&config.crawl.root, config.crawl.identity))
            }
            other => other,
        }
    }

    /// Opens a resumable frontier against the given backend
    pub fn with_storage(config: &CrawlConfig, storage: Box<dyn Storage>) -> Result<Self> {
        let root = &config.crawl.root;
        let strategy = config.crawl.identity;
        let mut resumed = false;

        let counters = match storage.load_counters()? {
            Some(counters) => {
                if !counters.matches_root(root) {
                    return Err(BurrowError::ResumeMismatch {
                        stored: counters.root_path,
                        configured: root.clone(),
                    });
                }
                if counters.identity != strategy {
                    return Err(BurrowError::IdentityMismatch {
                        stored: counters.identity,
                        configured: strategy,
                    });
                }
                resumed = true;
                counters
            }
            None => CrawlCounters::new(root.as_str(), strategy),
        };

        let identities = match storage.load_identities()? {
            Some(sequence) => {
                let set = IdentitySet::from_sequence(sequence);
                if let Some(stored) = set.strategy().filter(|s| *s != strategy) {
                    return Err(BurrowError::IdentityMismatch {
                        stored,
                        configured: strategy,
                    });
                }
                resumed = true;
                set
            }
            None => IdentitySet::new(),
        };

        if resumed {
            tracing::info!(
                "Resuming crawl of {} from {} storage ({} files seen)",
                counters.root_path,
                storage.name(),
                identities.len()
            );
        }

        Ok(Self {
            counters,
            identities,
            strategy,
            resumed,
            storage: Some(storage),
        })
    }

    // ===== Counters =====

    pub fn mark_visited_dir(&mut self) {
        self.counters.visited_dirs += 1;
    }

    pub fn mark_skipped_dir(&mut self) {
        self.counters.skipped_dirs += 1;
    }

    pub fn mark_processed_file(&mut self) {
        self.counters.processed_files += 1;
    }

    pub fn mark_skipped_file(&mut self) {
        self.counters.skipped_files += 1;
    }

    pub fn record_max_depth(&mut self, depth: u32) {
        self.counters.record_max_depth(depth);
    }

    /// Marks the crawl as having covered the whole tree
    ///
    /// Informational only; a resumed crawl still walks every node.
    pub fn finish(&mut self) {
        self.counters.finished = true;
        tracing::info!("Frontier signaled finished");
    }

    // ===== Deduplication =====

    pub fn seen(&self, id: &FileIdentity) -> bool {
        self.identities.contains(id)
    }

    pub fn mark_seen(&mut self, id: FileIdentity) {
        self.identities.insert(id);
    }

    /// Strategy used to derive identities for this crawl
    pub fn identity_strategy(&self) -> IdentityStrategy {
        self.strategy
    }

    // ===== Accessors =====

    pub fn counters(&self) -> &CrawlCounters {
        &self.counters
    }

    pub fn identities(&self) -> &IdentitySet {
        &self.identities
    }

    pub fn root_path(&self) -> &str {
        &self.counters.root_path
    }

    pub fn max_depth(&self) -> Option<u32> {
        self.counters.max_depth_seen
    }

    pub fn visited_dir_count(&self) -> u64 {
        self.counters.visited_dirs
    }

    pub fn skipped_dir_count(&self) -> u64 {
        self.counters.skipped_dirs
    }

    pub fn processed_file_count(&self) -> u64 {
        self.counters.processed_files
    }

    pub fn skipped_file_count(&self) -> u64 {
        self.counters.skipped_files
    }

    /// Length of the identity sequence, reported as "files seen"
    pub fn seen_file_count(&self) -> usize {
        self.identities.len()
    }

    pub fn is_finished(&self) -> bool {
        self.counters.finished
    }

    /// Whether any persisted state was found when the frontier was opened
    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    /// Whether checkpoints reach storage
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    // ===== Persistence =====

    /// Writes identities, then counters, to storage; no-op when not persistent
    ///
    /// Counters never run ahead of the identities they describe, so an
    /// interrupted checkpoint can under-count but never causes reprocessing.
    pub fn checkpoint(&mut self) -> std::result::Result<(), StorageError> {
        self.checkpoint_identities()?;
        self.checkpoint_counters()
    }

    /// Writes only the counters
    pub fn checkpoint_counters(&mut self) -> std::result::Result<(), StorageError> {
        let Some(storage) = self.storage.as_mut() else {
            return Ok(());
        };
        self.counters.updated_at = Some(Utc::now());
        storage.save_counters(&self.counters)
    }

    /// Writes only the identity sequence
    pub fn checkpoint_identities(&mut self) -> std::result::Result<(), StorageError> {
        let Some(storage) = self.storage.as_mut() else {
            return Ok(());
        };
        storage.save_identities(self.identities.as_slice())
    }

    /// Checkpoints, applying the storage error policy on failure
    ///
    /// With `Continue`, a failed save is logged and persistence is switched
    /// off for the rest of the run.
    pub fn sync(&mut self, policy: StorageErrorPolicy) -> Result<()> {
        match self.checkpoint() {
            Ok(()) => {
                tracing::debug!(
                    "Checkpointed {} processed files, {} identities",
                    self.counters.processed_files,
                    self.identities.len()
                );
                Ok(())
            }
            Err(e) if policy == StorageErrorPolicy::Continue => {
                tracing::warn!("Checkpoint failed ({}); continuing without persistence", e);
                self.disable_persistence();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Stops all further writes to storage
    pub fn disable_persistence(&mut self) {
        self.storage = None;
    }
}
