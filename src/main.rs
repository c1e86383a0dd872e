//! vk-wall-archive main entry point
//!
//! This is the command-line interface for the wall archiver.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vk_wall_archive::config::{load_or_default, parse_target, Config, RunTarget};
use vk_wall_archive::output::print_statistics;
use vk_wall_archive::pipeline::run_archive;
use vk_wall_archive::storage::{BatchStore, FileLimiter};

/// Exit status for malformed ids on the command line
const WRONG_ARGUMENT_EXIT: i32 = 255;

/// vk-wall-archive: fetch all posts from a VK group wall
///
/// Downloads the wall in batches into a local cache, resolves author names
/// and writes every post with its photos and links into
/// `{result}/{author}/{date}_{id}/`. Re-running with an existing cache skips
/// the download.
#[derive(Parser, Debug)]
#[command(name = "vk-wall-archive")]
#[command(version)]
#[command(about = "Fetch all posts from a VK group wall", long_about = None)]
struct Cli {
    /// A group id to work with (negative for communities)
    #[arg(short, long, value_name = "ID", allow_hyphen_values = true)]
    group: String,

    /// A comma-separated list of author ids
    #[arg(short, long, value_name = "IDS", allow_hyphen_values = true)]
    authors: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective configuration and exit without fetching or writing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let target = match parse_target(&cli.group, cli.authors.as_deref()) {
        Ok(target) => target,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(WRONG_ARGUMENT_EXIT);
        }
    };

    let config = load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    if cli.dry_run {
        handle_dry_run(&config, &target);
        return Ok(());
    }

    let summary = run_archive(config, target).await.context("Archive failed")?;

    if !cli.quiet {
        print_statistics(&summary);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vk_wall_archive=info,warn"),
            1 => EnvFilter::new("vk_wall_archive=debug,info"),
            2 => EnvFilter::new("vk_wall_archive=trace,debug"),
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

/// Handles the --dry-run mode: shows what a run would do
fn handle_dry_run(config: &Config, target: &RunTarget) {
    println!("=== vk-wall-archive Dry Run ===\n");

    println!("Target:");
    println!("  Group: {}", target.group_id);
    if target.author_ids.is_empty() {
        println!("  Authors: none (all posts attributed to Anonymous)");
    } else {
        let ids: Vec<String> = target.author_ids.iter().map(|id| id.to_string()).collect();
        println!("  Authors: {}", ids.join(","));
    }

    println!("\nAPI:");
    println!("  Base URL: {}", config.api.base_url);
    println!(
        "  Version: {}",
        config.api.version.as_deref().unwrap_or("(not sent)")
    );
    println!("  User agent: {}", config.api.user_agent);
    println!("  HEAD before download: {}", config.api.probe_before_download);

    println!("\nPaging:");
    println!("  Discovery count: {}", config.paging.discovery_count);
    println!("  Page size: {}", config.paging.page_size);

    println!("\nOutput:");
    println!("  Batch cache: {}", config.output.cache_dir);
    println!("  Result root: {}", config.output.result_dir);
    println!("  Max open files: {}", config.output.max_open_files);

    let store = BatchStore::new(&config.output.cache_dir, FileLimiter::new(1));
    if store.exists() {
        println!("\n✓ Batch cache present: would skip the download and materialize");
    } else {
        println!("\n✓ No batch cache: would download the wall first");
    }
}
