use crate::config::types::{CrawlConfig, CrawlSettings, StorageConfig};
use crate::ConfigError;
use std::path::MAIN_SEPARATOR;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_crawl_settings(&config.crawl)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Returns the configuration with derived values filled in
///
/// The root path always ends with a path separator afterwards, which is what
/// the resume check and relative path computation compare against.
pub fn normalize(mut config: CrawlConfig) -> CrawlConfig {
    if !ends_with_separator(&config.crawl.root) {
        config.crawl.root.push(MAIN_SEPARATOR);
    }
    config
}

/// Validates and normalizes in one step
pub fn prepare(config: CrawlConfig) -> Result<CrawlConfig, ConfigError> {
    validate(&config)?;
    Ok(normalize(config))
}

fn ends_with_separator(path: &str) -> bool {
    path.ends_with('/') || path.ends_with(MAIN_SEPARATOR)
}

/// Validates traversal settings
fn validate_crawl_settings(settings: &CrawlSettings) -> Result<(), ConfigError> {
    if settings.root.trim().is_empty() {
        return Err(ConfigError::Validation(
            "Path to directory is not set (crawl.root)".to_string(),
        ));
    }

    if settings.delay_ms < 0 {
        return Err(ConfigError::Validation(format!(
            "delay-ms cannot be less than 0, got {}",
            settings.delay_ms
        )));
    }

    Ok(())
}

/// Validates persistence settings
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.folder.trim().is_empty() {
        return Err(ConfigError::Validation(
            "Crawl storage folder is not set (storage.folder)".to_string(),
        ));
    }

    Ok(())
}
