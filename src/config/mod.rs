//! Configuration module for Burrow
//!
//! This module handles loading, parsing, validating and normalizing TOML
//! configuration files.
//!
//! # Example
//!
//! ```no_run
//! use burrow::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("burrow.toml")).unwrap();
//! println!("Storage folder: {}", config.storage.folder);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CrawlConfig, CrawlSettings, StorageBackend, StorageConfig, StorageErrorPolicy};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{normalize, prepare, validate};
