//! Burrow main entry point
//!
//! This is the command-line interface for the Burrow directory crawler.

use anyhow::Context;
use burrow::config::{load_config_with_hash, CrawlConfig};
use burrow::crawler::{Controller, CrawlHooks, FileView};
use burrow::output::{print_statistics, CrawlStatistics};
use burrow::path::{file_extension, root_display_name};
use burrow::storage::{has_stored_state, open_storage};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Burrow: a resumable directory-tree crawler
///
/// Burrow walks a directory tree depth-first, visiting every directory and
/// processing every file once. Progress is kept in a storage folder so an
/// interrupted crawl resumes without reprocessing files.
#[derive(Parser, Debug)]
#[command(name = "burrow")]
#[command(version = "1.0.0")]
#[command(about = "A resumable directory-tree crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume from the storage folder, overriding storage.resumable
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh crawl, clearing the storage folder
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the storage folder and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Do not descend into directories deeper than this
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Only process files with this extension (repeatable, e.g. --ext rs)
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.fresh {
        config.storage.resumable = false;
    } else if cli.resume {
        config.storage.resumable = true;
    }

    let hooks = CliHooks::new(cli.max_depth, &cli.extensions);

    if cli.dry_run {
        handle_dry_run(&config, &hooks);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, hooks, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("burrow=info,warn"),
            1 => EnvFilter::new("burrow=debug,info"),
            2 => EnvFilter::new("burrow=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Hooks installed by the command line
///
/// Applies `--max-depth` and `--ext`, logs each processed file relative to
/// the root and tallies processed files by extension.
struct CliHooks {
    max_depth: Option<u32>,
    extensions: Vec<String>,
    tally: BTreeMap<String, u64>,
}

impl CliHooks {
    fn new(max_depth: Option<u32>, extensions: &[String]) -> Self {
        let extensions = extensions
            .iter()
            .map(|ext| format!(".{}", ext.trim_start_matches('.').to_lowercase()))
            .collect();

        Self {
            max_depth,
            extensions,
            tally: BTreeMap::new(),
        }
    }
}

impl CrawlHooks for CliHooks {
    fn should_visit_dir(&mut self, _path: &Path, depth: u32) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }

    fn should_process_file(&mut self, path: &Path, _depth: u32) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.extensions.contains(&file_extension(&name))
    }

    fn on_process_file(&mut self, file: &FileView<'_>) {
        tracing::info!("{}", file.relative_path());
        *self.tally.entry(file.extension()).or_insert(0) += 1;
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &CrawlConfig, hooks: &CliHooks) {
    println!("=== Burrow Dry Run ===\n");

    println!("Crawl:");
    println!("  Root: {}", config.crawl.root);
    println!("  Display name: {}", root_display_name(&config.crawl.root));
    println!("  Hidden files: {}", config.crawl.hidden_files);
    println!("  Delay: {}ms", config.crawl.delay_ms);
    println!("  Identity: {}", config.crawl.identity);
    println!(
        "  Count rejected as skipped: {}",
        config.crawl.count_rejected_as_skipped
    );
    if let Some(max) = hooks.max_depth {
        println!("  Max depth: {}", max);
    }
    if !hooks.extensions.is_empty() {
        println!("  Extensions: {}", hooks.extensions.join(", "));
    }

    println!("\nStorage:");
    println!("  Folder: {}", config.storage.folder);
    println!("  Backend: {:?}", config.storage.backend);
    println!("  Resumable: {}", config.storage.resumable);
    println!("  Checkpoint interval: {}", config.storage.checkpoint_interval);
    println!("  On error: {:?}", config.storage.on_error);

    println!();
    if config.root_path().is_dir() {
        println!("✓ Configuration is valid");
        if config.is_resumable() {
            println!("✓ Would resume from {} if state exists", config.storage.folder);
        } else {
            println!("✓ Would clear {} and start fresh", config.storage.folder);
        }
    } else {
        println!("✗ This directory doesn't exist: {}", config.crawl.root);
    }
}

/// Handles the --stats mode: shows statistics from the storage folder
fn handle_stats(config: &CrawlConfig) -> anyhow::Result<()> {
    println!("Storage: {}\n", config.storage.folder);

    if !has_stored_state(config) {
        println!("No crawl state found");
        return Ok(());
    }

    let storage = open_storage(config).context("Failed to open crawl storage")?;
    let Some(counters) = storage.load_counters()? else {
        println!("No crawl state found");
        return Ok(());
    };
    let seen = storage.load_identities()?.map_or(0, |ids| ids.len());

    print_statistics(&CrawlStatistics::from_counters(&counters, seen));
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: CrawlConfig, mut hooks: CliHooks, quiet: bool) -> anyhow::Result<()> {
    if config.is_resumable() {
        tracing::info!("Starting crawl (will resume if state exists)");
    } else {
        tracing::info!("Starting fresh crawl (clearing previous state)");
    }

    let mut controller = Controller::new(config).context("Failed to start crawler")?;

    let cancel = controller.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current entry");
            cancel.cancel();
        }
    });

    // The walk and its sleeps are blocking
    let (walked, stats, hooks) = tokio::task::spawn_blocking(move || {
        let walked = controller.start(&mut hooks);
        let stats = controller.shutdown();
        (walked, stats, hooks)
    })
    .await
    .context("Crawl thread failed")?;

    let report = walked.context("Crawl failed")?;
    let stats = stats.context("Final checkpoint failed")?;

    tracing::info!(
        "{} files processed in {:.1}s ({:?})",
        report.files_processed,
        report.elapsed.as_secs_f64(),
        report.outcome
    );

    if !quiet && !hooks.tally.is_empty() {
        println!("\nProcessed by extension:");
        for (ext, count) in &hooks.tally {
            println!("  {}: {}", ext, count);
        }
    }

    if !stats.finished {
        tracing::info!("Crawl incomplete; run again to resume");
    }

    Ok(())
}
