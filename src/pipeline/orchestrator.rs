//! Archive orchestrator - top-level run control
//!
//! This module decides whether the wall has to be downloaded (no completed
//! batch cache yet) or whether the run can go straight to materialization,
//! then resolves authors and materializes every cached batch.

use crate::api::VkClient;
use crate::config::{Config, RunTarget};
use crate::output::{ArchiveLayout, ArchiveSummary, RunStatistics};
use crate::pipeline::materializer::process_all;
use crate::pipeline::paginator::fetch_all_batches;
use crate::pipeline::ArchiveContext;
use crate::state::AuthorDirectory;
use crate::storage::{BatchStore, FileLimiter, StorageError};
use crate::ArchiveError;
use std::path::PathBuf;
use std::sync::Arc;

/// Main archive orchestrator
pub struct Orchestrator {
    config: Config,
    target: RunTarget,
    client: VkClient,
    limiter: FileLimiter,
    store: BatchStore,
    stats: Arc<RunStatistics>,
}

impl Orchestrator {
    /// Creates a new orchestrator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The archive configuration
    /// * `target` - Wall owner and authors to resolve
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Successfully created orchestrator
    /// * `Err(ArchiveError)` - Failed to build the HTTP client
    pub fn new(config: Config, target: RunTarget) -> Result<Self, ArchiveError> {
        let client = VkClient::new(&config.api)?;
        let limiter = FileLimiter::new(config.output.max_open_files);
        let store = BatchStore::new(&config.output.cache_dir, limiter.clone());

        Ok(Self {
            config,
            target,
            client,
            limiter,
            store,
            stats: Arc::new(RunStatistics::new()),
        })
    }

    pub fn store(&self) -> &BatchStore {
        &self.store
    }

    /// Runs the archive to completion
    ///
    /// 1. Create the result root (fatal on failure)
    /// 2. Download all batches unless a completed cache exists
    /// 3. Resolve author names
    /// 4. Materialize every batch, waiting for all posts and attachments
    pub async fn run(&self) -> Result<ArchiveSummary, ArchiveError> {
        let result_root = PathBuf::from(&self.config.output.result_dir);
        self.limiter
            .create_dir_all(&result_root)
            .await
            .map_err(|source| StorageError::io(&result_root, source))?;

        if self.store.exists() {
            tracing::info!(
                "Batch cache found at {}, skipping download",
                self.store.path().display()
            );
        } else {
            tracing::info!("Downloading wall of {}", self.target.group_id);
            fetch_all_batches(
                &self.client,
                &self.store,
                &self.config.paging,
                self.target.group_id,
                &self.stats,
            )
            .await?;
        }

        let authors = AuthorDirectory::resolve(&self.client, &self.target.author_ids).await;

        let context = Arc::new(ArchiveContext {
            client: self.client.clone(),
            authors,
            limiter: self.limiter.clone(),
            layout: ArchiveLayout::new(result_root),
            stats: Arc::clone(&self.stats),
            probe_before_download: self.config.api.probe_before_download,
        });

        process_all(context, &self.store).await?;

        let summary = self.stats.summary();
        tracing::info!(
            "Archive complete: {} posts written, {} photos, {} links, {} errors",
            summary.posts_written,
            summary.photos_downloaded,
            summary.links_written,
            summary.total_errors()
        );

        Ok(summary)
    }
}

/// Runs a complete archive operation
///
/// # Example
///
/// ```no_run
/// use vk_wall_archive::config::{Config, RunTarget};
/// use vk_wall_archive::pipeline::run_archive;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let target = RunTarget { group_id: -100, author_ids: vec![42] };
/// let summary = run_archive(Config::default(), target).await?;
/// println!("{} posts written", summary.posts_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_archive(config: Config, target: RunTarget) -> Result<ArchiveSummary, ArchiveError> {
    Orchestrator::new(config, target)?.run().await
}
