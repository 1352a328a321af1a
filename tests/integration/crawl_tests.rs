//! Integration tests for the crawler
//!
//! These tests build small directory trees in temporary folders and run the
//! full controller cycle end-to-end, including resume across runs.

use burrow::config::{parse_config, CrawlConfig, StorageBackend};
use burrow::crawler::{run_crawl, Controller, DefaultHooks, FnHooks, WalkOutcome};
use burrow::state::IdentityStrategy;
use burrow::storage::{
    FileStorage, SqliteStorage, Storage, COUNTERS_FILE, DATABASE_FILE, IDENTITIES_FILE,
};
use burrow::BurrowError;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A tree to crawl plus a storage folder
///
/// root/
///   readme.md
///   src/
///     main.rs
///     lib.rs
///     util/
///       mod.rs
///   docs/
///     guide.txt
struct Fixture {
    tree: TempDir,
    store: TempDir,
}

const FILE_COUNT: u64 = 5;
const DIR_COUNT: u64 = 3;

impl Fixture {
    fn new() -> Self {
        let tree = TempDir::new().unwrap();
        let root = tree.path();
        fs::create_dir_all(root.join("src").join("util")).unwrap();
        fs::create_dir(root.join("docs")).unwrap();
        write(root, "readme.md");
        write(root, "src/main.rs");
        write(root, "src/lib.rs");
        write(root, "src/util/mod.rs");
        write(root, "docs/guide.txt");

        Self {
            tree,
            store: TempDir::new().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.tree.path()
    }

    fn config(&self, resumable: bool) -> CrawlConfig {
        let mut config = CrawlConfig::new(
            self.tree.path().to_string_lossy(),
            self.store.path().to_string_lossy(),
        );
        config.crawl.delay_ms = 0;
        config.crawl.print_stats = false;
        config.storage.resumable = resumable;
        config
    }
}

fn write(root: &Path, relative: &str) {
    fs::write(root.join(relative), relative).unwrap();
}

/// Runs a crawl and returns the relative paths of processed files
fn crawl_collect(config: CrawlConfig) -> Vec<String> {
    let mut processed = Vec::new();
    {
        let mut hooks = FnHooks::new().for_each_file(|f| processed.push(f.relative_path()));
        run_crawl(config, &mut hooks).unwrap();
    }
    processed
}

/// Runs a crawl that cancels itself after `limit` processed files
fn crawl_until(config: CrawlConfig, limit: usize) -> Vec<String> {
    let mut controller = Controller::new(config).unwrap();
    let cancel = controller.cancel_token();
    let mut processed = Vec::new();
    {
        let mut hooks = FnHooks::new().for_each_file(|f| {
            processed.push(f.relative_path());
            if processed.len() >= limit {
                cancel.cancel();
            }
        });
        let report = controller.start(&mut hooks).unwrap();
        assert_eq!(report.outcome, WalkOutcome::Cancelled);
    }
    controller.shutdown().unwrap();
    processed
}

#[test]
fn test_full_crawl_counts() {
    let fx = Fixture::new();

    let processed = crawl_collect(fx.config(false));
    let stats = run_crawl(fx.config(false), &mut DefaultHooks).unwrap();

    assert_eq!(processed.len() as u64, FILE_COUNT);
    assert_eq!(stats.processed_files, FILE_COUNT);
    assert_eq!(stats.visited_dirs, DIR_COUNT + 1);
    assert_eq!(stats.skipped_dirs, 0);
    assert_eq!(stats.skipped_files, 0);
    assert_eq!(stats.max_depth, Some(3));
    assert!(stats.finished);
}

#[test]
fn test_file_depths() {
    let fx = Fixture::new();
    let mut depths = HashMap::new();
    {
        let mut hooks = FnHooks::new().for_each_file(|f| {
            depths.insert(f.name(), f.depth());
        });
        run_crawl(fx.config(false), &mut hooks).unwrap();
    }

    assert_eq!(depths["readme.md"], 1);
    assert_eq!(depths["guide.txt"], 2);
    assert_eq!(depths["main.rs"], 2);
    assert_eq!(depths["mod.rs"], 3);
}

#[test]
fn test_hidden_file_skipped_once_across_runs() {
    let fx = Fixture::new();
    write(fx.root(), ".env");
    fs::create_dir(fx.root().join(".cache")).unwrap();
    write(fx.root(), ".cache/blob");

    let first = run_crawl(fx.config(true), &mut DefaultHooks).unwrap();
    assert_eq!(first.skipped_files, 1);
    assert_eq!(first.skipped_dirs, 1);
    assert_eq!(first.processed_files, FILE_COUNT);

    let second = run_crawl(fx.config(true), &mut DefaultHooks).unwrap();
    assert_eq!(second.skipped_files, 1);
    assert_eq!(second.processed_files, FILE_COUNT);
    // Hidden directories are re-evaluated on every walk
    assert_eq!(second.skipped_dirs, 2);
}

#[test]
fn test_hidden_files_processed_when_enabled() {
    let fx = Fixture::new();
    write(fx.root(), ".env");
    let mut config = fx.config(false);
    config.crawl.hidden_files = true;

    let processed = crawl_collect(config);

    assert!(processed.contains(&"/.env".to_string()));
    assert_eq!(processed.len() as u64, FILE_COUNT + 1);
}

#[test]
fn test_resume_processes_each_file_once() {
    let fx = Fixture::new();

    let first = crawl_until(fx.config(true), 2);
    assert_eq!(first.len(), 2);

    let stored = FileStorage::new(fx.store.path())
        .unwrap()
        .load_counters()
        .unwrap()
        .unwrap();
    assert_eq!(stored.processed_files, 2);
    assert!(!stored.finished);

    let second = crawl_collect(fx.config(true));
    assert_eq!(second.len() as u64, FILE_COUNT - 2);

    let all: HashSet<_> = first.iter().chain(second.iter()).collect();
    assert_eq!(all.len() as u64, FILE_COUNT);

    let third = crawl_collect(fx.config(true));
    assert!(third.is_empty());

    let stats = run_crawl(fx.config(true), &mut DefaultHooks).unwrap();
    assert_eq!(stats.processed_files, FILE_COUNT);
    assert_eq!(stats.seen_files, FILE_COUNT);
    assert!(stats.finished);
    assert!(stats.resumed);
}

#[test]
fn test_cancelled_crawl_is_checkpointed_not_finished() {
    let fx = Fixture::new();

    crawl_until(fx.config(true), 1);

    let storage = FileStorage::new(fx.store.path()).unwrap();
    let counters = storage.load_counters().unwrap().unwrap();
    let identities = storage.load_identities().unwrap().unwrap();
    assert!(!counters.finished);
    assert_eq!(counters.processed_files, 1);
    assert_eq!(identities.len(), 1);
    assert!(counters.updated_at.is_some());
}

#[test]
fn test_root_mismatch_leaves_state_untouched() {
    let fx = Fixture::new();
    run_crawl(fx.config(true), &mut DefaultHooks).unwrap();

    let counters_before = fs::read(fx.store.path().join(COUNTERS_FILE)).unwrap();
    let identities_before = fs::read(fx.store.path().join(IDENTITIES_FILE)).unwrap();

    let other = TempDir::new().unwrap();
    write(other.path(), "x.txt");
    let mut config = fx.config(true);
    config.crawl.root = other.path().to_string_lossy().into_owned();

    match Controller::new(config) {
        Err(BurrowError::ResumeMismatch { stored, configured }) => {
            assert!(stored.starts_with(&*fx.root().to_string_lossy()));
            assert!(configured.starts_with(&*other.path().to_string_lossy()));
        }
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("expected a resume mismatch"),
    }

    assert_eq!(fs::read(fx.store.path().join(COUNTERS_FILE)).unwrap(), counters_before);
    assert_eq!(fs::read(fx.store.path().join(IDENTITIES_FILE)).unwrap(), identities_before);
}

#[test]
fn test_identity_strategy_mismatch() {
    let fx = Fixture::new();
    run_crawl(fx.config(true), &mut DefaultHooks).unwrap();

    let mut config = fx.config(true);
    config.crawl.identity = IdentityStrategy::ExactPath;

    assert!(matches!(
        Controller::new(config),
        Err(BurrowError::IdentityMismatch {
            stored: IdentityStrategy::PathHash,
            configured: IdentityStrategy::ExactPath,
        })
    ));
}

#[test]
fn test_exact_path_identity_resume() {
    let fx = Fixture::new();
    let mut config = fx.config(true);
    config.crawl.identity = IdentityStrategy::ExactPath;

    crawl_until(config.clone(), 3);
    let rest = crawl_collect(config);

    assert_eq!(rest.len() as u64, FILE_COUNT - 3);
}

#[test]
fn test_rejected_files_not_counted_by_default() {
    let fx = Fixture::new();
    let mut processed = 0;
    let stats = {
        let mut hooks = FnHooks::new()
            .process_file_when(|path, _| path.extension().is_some_and(|e| e == "rs"))
            .for_each_file(|_| processed += 1);
        run_crawl(fx.config(false), &mut hooks).unwrap()
    };

    assert_eq!(processed, 3);
    assert_eq!(stats.processed_files, 3);
    assert_eq!(stats.skipped_files, 0);
    assert_eq!(stats.seen_files, FILE_COUNT);
}

#[test]
fn test_rejected_files_counted_when_enabled() {
    let fx = Fixture::new();
    let mut config = fx.config(false);
    config.crawl.count_rejected_as_skipped = true;

    let mut hooks =
        FnHooks::new().process_file_when(|path, _| path.extension().is_some_and(|e| e == "rs"));
    let stats = run_crawl(config, &mut hooks).unwrap();

    assert_eq!(stats.processed_files, 3);
    assert_eq!(stats.skipped_files, 2);
}

#[test]
fn test_rejected_file_stays_rejected_after_resume() {
    let fx = Fixture::new();
    {
        let mut hooks =
            FnHooks::new().process_file_when(|path, _| !path.ends_with("readme.md"));
        run_crawl(fx.config(true), &mut hooks).unwrap();
    }

    let again = crawl_collect(fx.config(true));
    assert!(again.is_empty());
}

#[test]
fn test_directory_predicate_limits_depth() {
    let fx = Fixture::new();
    let mut hooks = FnHooks::new().visit_dir_when(|_, depth| depth <= 1);

    let stats = run_crawl(fx.config(false), &mut hooks).unwrap();

    assert_eq!(stats.visited_dirs, 3);
    assert_eq!(stats.skipped_dirs, 1);
    assert_eq!(stats.processed_files, FILE_COUNT - 1);
}

#[test]
fn test_sqlite_backend_resume() {
    let fx = Fixture::new();
    let mut config = fx.config(true);
    config.storage.backend = StorageBackend::Sqlite;

    let first = crawl_until(config.clone(), 2);
    assert!(fx.store.path().join(DATABASE_FILE).exists());
    assert!(!fx.store.path().join(COUNTERS_FILE).exists());

    let db = SqliteStorage::in_folder(fx.store.path()).unwrap();
    assert_eq!(db.load_identities().unwrap().unwrap().len(), 2);
    drop(db);

    let second = crawl_collect(config.clone());
    assert_eq!((first.len() + second.len()) as u64, FILE_COUNT);

    let stats = run_crawl(config, &mut DefaultHooks).unwrap();
    assert_eq!(stats.processed_files, FILE_COUNT);
    assert!(stats.finished);
}

#[test]
fn test_fresh_crawl_clears_previous_state() {
    let fx = Fixture::new();
    run_crawl(fx.config(true), &mut DefaultHooks).unwrap();
    assert!(fx.store.path().join(COUNTERS_FILE).exists());

    let processed = crawl_collect(fx.config(false));

    assert_eq!(processed.len() as u64, FILE_COUNT);
    assert!(!fx.store.path().join(COUNTERS_FILE).exists());
    assert!(!fx.store.path().join(IDENTITIES_FILE).exists());
}

#[test]
fn test_new_files_picked_up_on_resume() {
    let fx = Fixture::new();
    run_crawl(fx.config(true), &mut DefaultHooks).unwrap();

    write(fx.root(), "docs/added.txt");
    let processed = crawl_collect(fx.config(true));

    assert_eq!(processed, vec!["/docs/added.txt".to_string()]);
}

#[test]
fn test_config_from_toml() {
    let fx = Fixture::new();
    let toml = format!(
        r#"
[crawl]
root = "{}"
delay-ms = 0
print-stats = false
identity = "exact-path"

[storage]
folder = "{}"
resumable = true
backend = "sqlite"
checkpoint-interval = 2
"#,
        fx.root().display().to_string().replace('\\', "\\\\"),
        fx.store.path().display().to_string().replace('\\', "\\\\")
    );
    let config = parse_config(&toml).unwrap();

    let stats = run_crawl(config, &mut DefaultHooks).unwrap();

    assert_eq!(stats.processed_files, FILE_COUNT);
    assert!(fx.store.path().join(DATABASE_FILE).exists());
}
