use crate::config::types::CrawlConfig;
use crate::config::validation::prepare;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CrawlConfig)` - Successfully loaded, validated and normalized configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use burrow::config::load_config;
///
/// let config = load_config(Path::new("burrow.toml")).unwrap();
/// println!("Crawling: {}", config.crawl.root);
/// ```
pub fn load_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text
pub fn parse_config(content: &str) -> Result<CrawlConfig, ConfigError> {
    let config: CrawlConfig = toml::from_str(content)?;
    prepare(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(CrawlConfig, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StorageBackend, StorageErrorPolicy};
    use crate::state::IdentityStrategy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawl]
root = "/data/tree"
hidden-files = true
delay-ms = 5
print-stats = true
identity = "exact-path"

[storage]
folder = "./crawl-storage"
resumable = true
backend = "sqlite"
checkpoint-interval = 50
on-error = "continue"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert!(config.crawl.root.starts_with("/data/tree"));
        assert!(config.crawl.hidden_files);
        assert_eq!(config.crawl.delay_ms, 5);
        assert!(config.crawl.print_stats);
        assert!(!config.crawl.count_rejected_as_skipped);
        assert_eq!(config.crawl.identity, IdentityStrategy::ExactPath);
        assert_eq!(config.storage.folder, "./crawl-storage");
        assert!(config.storage.resumable);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.checkpoint_interval, 50);
        assert_eq!(config.storage.on_error, StorageErrorPolicy::Continue);
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let config = parse_config(
            r#"
[crawl]
root = "/data"

[storage]
folder = "/tmp/store"
"#,
        )
        .unwrap();

        assert!(!config.crawl.hidden_files);
        assert_eq!(config.crawl.delay_ms, 100);
        assert_eq!(config.crawl.identity, IdentityStrategy::PathHash);
        assert!(!config.storage.resumable);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.on_error, StorageErrorPolicy::Abort);
    }

    #[test]
    fn test_missing_storage_section_is_parse_error() {
        let result = parse_config("[crawl]\nroot = \"/data\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_negative_delay_is_validation_error() {
        let result = parse_config(
            r#"
[crawl]
root = "/data"
delay-ms = -10

[storage]
folder = "/tmp/store"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/burrow.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);

        let other = create_temp_config("other content");
        assert_ne!(hash1, compute_config_hash(other.path()).unwrap());
    }
}
