//! Crawl controller - storage folder lifecycle and run orchestration
//!
//! The controller prepares everything the engine needs before a walk:
//! - Validating and normalizing the configuration
//! - Creating (or clearing) the storage folder
//! - Opening the frontier, fresh or resumed
//!
//! and checkpoints and reports once the walk is over.

use crate::config::{prepare, CrawlConfig};
use crate::crawler::cancel::CancelToken;
use crate::crawler::engine::{TraversalEngine, TraversalSettings, WalkReport};
use crate::crawler::hooks::CrawlHooks;
use crate::output::{print_statistics, CrawlStatistics};
use crate::state::Frontier;
use crate::storage::clear_folder;
use crate::{BurrowError, ConfigError, Result};

/// Owns the configuration and frontier for one crawl run
pub struct Controller {
    config: CrawlConfig,
    frontier: Frontier,
    cancel: CancelToken,
}

impl Controller {
    /// Creates a controller ready to start
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration; validated and normalized here
    ///
    /// # Returns
    ///
    /// * `Ok(Controller)` - Storage folder prepared and frontier opened
    /// * `Err(BurrowError)` - Invalid configuration, missing root, storage
    ///   failure, or persisted state for a different root
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let config = prepare(config)?;

        let folder = config.storage_folder();
        if !folder.exists() {
            std::fs::create_dir_all(&folder).map_err(|source| ConfigError::StorageFolder {
                path: config.storage.folder.clone(),
                source,
            })?;
        }

        let root = config.root_path();
        if !root.is_dir() {
            return Err(ConfigError::MissingRoot(config.crawl.root.clone()).into());
        }

        let canonical_root = root.canonicalize().map_err(|source| BurrowError::Traversal {
            path: root.to_path_buf(),
            source,
        })?;
        let canonical_folder = folder.canonicalize()?;
        if canonical_root.starts_with(&canonical_folder) {
            return Err(ConfigError::Validation(format!(
                "Crawl root {} is inside the storage folder {}",
                config.crawl.root, config.storage.folder
            ))
            .into());
        }

        if !config.is_resumable() {
            clear_folder(&folder)?;
        }

        let frontier = Frontier::open(&config)?;

        tracing::info!("Crawler is ready");
        Ok(Self {
            config,
            frontier,
            cancel: CancelToken::new(),
        })
    }

    /// Runs the traversal with `hooks`
    ///
    /// Progress from a previous run is reported before the walk starts.
    pub fn start<H: CrawlHooks>(&mut self, hooks: &mut H) -> Result<WalkReport> {
        if self.frontier.is_resumed() {
            tracing::info!(
                "Files processed so far: {}",
                self.frontier.processed_file_count()
            );
        }

        let settings = TraversalSettings::from_config(&self.config);
        TraversalEngine::new(self.config.root_path(), &mut self.frontier, hooks, settings)
            .with_cancel_token(self.cancel.clone())
            .run()
    }

    /// Final checkpoint plus statistics
    ///
    /// Prints the statistics block when `crawl.print-stats` is set.
    pub fn shutdown(mut self) -> Result<CrawlStatistics> {
        tracing::info!("Shutting down crawler");
        self.frontier.sync(self.config.storage.on_error)?;

        let stats = CrawlStatistics::from_frontier(&self.frontier);
        if self.config.crawl.print_stats {
            print_statistics(&stats);
        }
        Ok(stats)
    }

    /// Token that stops the walk between node visits when cancelled
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }
}

/// Runs a complete crawl: new, start, shutdown
///
/// The final checkpoint happens even when the walk fails; the walk error is
/// reported in preference to a checkpoint error.
pub fn run_crawl<H: CrawlHooks>(config: CrawlConfig, hooks: &mut H) -> Result<CrawlStatistics> {
    let mut controller = Controller::new(config)?;
    let walked = controller.start(hooks);
    let stats = controller.shutdown();
    walked?;
    stats
}
