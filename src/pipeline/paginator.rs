//! Pagination driver
//!
//! Downloads every wall batch in order and persists each raw body. Batch
//! N+1 is never requested before batch N has been written. There is no
//! retry: the first failed call or write aborts the download, and because
//! batches are staged the cache is not published until every batch is in.

use crate::api::{VkClient, WallPage};
use crate::config::PagingConfig;
use crate::output::{RunEvent, RunStatistics};
use crate::state::{PageRequest, Pagination, PaginationState};
use crate::storage::{BatchStore, BatchWriter};
use crate::ArchiveError;

/// Fetches all batches of a wall into the batch store
///
/// # Arguments
///
/// * `client` - The remote API client
/// * `store` - The batch cache to populate; must not exist yet
/// * `paging` - Discovery and page sizes
/// * `group_id` - Wall owner id
/// * `stats` - Run counters
///
/// # Returns
///
/// * `Ok(PaginationState::Done)` - Every batch was fetched and the cache published
/// * `Err(ArchiveError::Pagination)` - A call, decode or write failed at the given offset
pub async fn fetch_all_batches(
    client: &VkClient,
    store: &BatchStore,
    paging: &PagingConfig,
    group_id: i64,
    stats: &RunStatistics,
) -> Result<PaginationState, ArchiveError> {
    let mut writer = store.begin().await?;
    let mut pagination = Pagination::new(paging);

    while let Some(request) = pagination.next_request() {
        match fetch_batch(client, &mut writer, group_id, request).await {
            Ok(total) => {
                pagination.record_batch(request, total);
                stats.record(RunEvent::BatchFetched);
                tracing::info!(
                    "Downloaded posts batch {} ({})",
                    request.offset,
                    pagination.state()
                );
            }
            Err(e) => {
                pagination.fail();
                tracing::error!("Wall download {}: {}", pagination.state(), e);
                return Err(ArchiveError::Pagination {
                    offset: request.offset,
                    source: Box::new(e),
                });
            }
        }
    }

    let batches = writer.written();
    writer.commit().await?;
    tracing::info!(
        "Downloaded everything ({} batches), proceeding...",
        batches
    );

    Ok(pagination.state())
}

/// Fetches and persists one batch; returns the reported total
///
/// Posts are left raw here, only the envelope and the count are checked.
async fn fetch_batch(
    client: &VkClient,
    writer: &mut BatchWriter,
    group_id: i64,
    request: PageRequest,
) -> Result<u64, ArchiveError> {
    let body = client
        .fetch_wall(group_id, request.offset, request.count)
        .await?;
    let page = WallPage::parse(&body)?;
    writer.write(request.offset, &body).await?;
    Ok(page.total_count)
}
