//! Archive pipeline
//!
//! This module contains the paginated-fetch-then-process pipeline:
//! - Pagination driver: downloads every wall batch into the batch cache
//! - Post materializer: turns cached batches into the archive tree
//! - Attachment fetcher: downloads photos and serializes links
//! - Orchestrator: chooses between fetching and resuming from the cache

pub mod attachments;
mod context;
pub mod materializer;
mod orchestrator;
pub mod paginator;

pub use context::ArchiveContext;
pub use orchestrator::{run_archive, Orchestrator};

use tokio::task::JoinSet;

/// Waits for every task in the set
///
/// Tasks report their own failures; a panicked task is logged and the
/// remaining siblings still run to completion.
pub(crate) async fn join_all(mut tasks: JoinSet<()>) {
    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            tracing::error!("Task failed: {}", e);
        }
    }
}
