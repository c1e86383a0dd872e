//! Run-scoped state shared by all materialization tasks

use crate::api::VkClient;
use crate::output::{ArchiveLayout, RunEvent, RunStatistics};
use crate::state::AuthorDirectory;
use crate::storage::FileLimiter;
use std::sync::Arc;

/// Everything a post or attachment task needs, shared behind an `Arc`
#[derive(Debug)]
pub struct ArchiveContext {
    pub client: VkClient,
    pub authors: AuthorDirectory,
    pub limiter: FileLimiter,
    pub layout: ArchiveLayout,
    pub stats: Arc<RunStatistics>,

    /// Issue a HEAD request before each photo download
    pub probe_before_download: bool,
}

impl ArchiveContext {
    pub fn record(&self, event: RunEvent) {
        self.stats.record(event);
    }
}
