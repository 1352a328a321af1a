//! Burrow: a resumable directory-tree crawler
//!
//! This crate walks a directory tree depth-first, handing every directory and
//! file to client-supplied hooks, and keeps enough progress on disk that an
//! interrupted crawl can pick up where it left off without reprocessing files.

pub mod config;
pub mod crawler;
pub mod output;
pub mod path;
pub mod state;
pub mod storage;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Burrow operations
#[derive(Debug, Error)]
pub enum BurrowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "The config's root path ({configured}) is not the same as the path from the previous crawl: {stored}. \
         Specify the same path or use a different crawl storage folder."
    )]
    ResumeMismatch { stored: String, configured: String },

    #[error(
        "The previous crawl identified files by {stored} but the config asks for {configured}. \
         Use the same identity strategy or a different crawl storage folder."
    )]
    IdentityMismatch {
        stored: state::IdentityStrategy,
        configured: state::IdentityStrategy,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error at {path}: {source}")]
    Traversal {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("This directory doesn't exist: {0}")]
    MissingRoot(String),

    #[error("Couldn't create storage folder {path}: {source}")]
    StorageFolder {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for Burrow operations
pub type Result<T> = std::result::Result<T, BurrowError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{run_crawl, CancelToken, Controller, CrawlHooks, DirView, FileView, FnHooks};
pub use output::CrawlStatistics;
pub use path::{file_extension, relative_path, root_display_name};
pub use state::{CrawlCounters, FileIdentity, Frontier, IdentitySet, IdentityStrategy};
