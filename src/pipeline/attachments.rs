//! Attachment fetcher
//!
//! Photos are downloaded to `attachments/{id}.{jpg|png}` with their caption in
//! `attachments/{id}.txt`; links are serialized to
//! `attachments/link_{index}.txt`. Every attachment runs as its own task and
//! a failure only affects that attachment.

use crate::api::{Attachment, Photo};
use crate::output::layout::{
    attachments_dir, caption_file_name, link_file_name, photo_extension, photo_file_name,
};
use crate::output::RunEvent;
use crate::pipeline::{join_all, ArchiveContext};
use crate::storage::{FileLimiter, StorageError};
use crate::ArchiveError;
use reqwest::Client;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Processes all attachments of a post concurrently and waits for them
///
/// `index` in link file names is the attachment's position in `attachments`,
/// so skipped entries leave gaps rather than renumbering.
pub async fn process_attachments(
    ctx: Arc<ArchiveContext>,
    attachments: Vec<Attachment>,
    post_dir: PathBuf,
) {
    let dir = attachments_dir(&post_dir);
    let mut tasks = JoinSet::new();

    for (index, attachment) in attachments.into_iter().enumerate() {
        match attachment {
            Attachment::Photo { photo } => {
                if photo.source_url.is_none() {
                    tracing::warn!(
                        "Photo {} in {} has no source URL, skipping",
                        photo.id,
                        post_dir.display()
                    );
                    ctx.record(RunEvent::AttachmentIgnored);
                    continue;
                }
                tasks.spawn(photo_task(Arc::clone(&ctx), photo, dir.clone()));
            }
            Attachment::Link { link } => {
                tasks.spawn(link_task(Arc::clone(&ctx), link, index, dir.clone()));
            }
            Attachment::Other => {
                tracing::debug!(
                    "Ignoring attachment {} of {}",
                    index,
                    post_dir.display()
                );
                ctx.record(RunEvent::AttachmentIgnored);
            }
        }
    }

    join_all(tasks).await;
}

async fn photo_task(ctx: Arc<ArchiveContext>, photo: Photo, dir: PathBuf) {
    match save_photo(&ctx, &photo, &dir).await {
        Ok(path) => {
            ctx.record(RunEvent::PhotoDownloaded);
            tracing::info!("Downloaded: {}", path.display());
        }
        Err(e) => {
            ctx.record(RunEvent::AttachmentFailed);
            tracing::warn!("Failed to download photo {}: {}", photo.id, e);
        }
    }
}

async fn link_task(ctx: Arc<ArchiveContext>, link: Value, index: usize, dir: PathBuf) {
    match save_link(&ctx.limiter, &link, index, &dir).await {
        Ok(path) => {
            ctx.record(RunEvent::LinkWritten);
            tracing::info!("Wrote link {}", path.display());
        }
        Err(e) => {
            ctx.record(RunEvent::AttachmentFailed);
            tracing::warn!("Failed to write link {} in {}: {}", index, dir.display(), e);
        }
    }
}

/// Writes the link payload as compact JSON
pub async fn save_link(
    limiter: &FileLimiter,
    link: &Value,
    index: usize,
    dir: &Path,
) -> Result<PathBuf, ArchiveError> {
    limiter
        .create_dir_all(dir)
        .await
        .map_err(|source| StorageError::io(dir, source))?;

    let path = dir.join(link_file_name(index));
    let json = serde_json::to_string(link)?;
    limiter
        .write(&path, json)
        .await
        .map_err(|source| StorageError::io(&path, source))?;

    Ok(path)
}

/// Downloads the image, then writes its caption next to it
async fn save_photo(
    ctx: &ArchiveContext,
    photo: &Photo,
    dir: &Path,
) -> Result<PathBuf, ArchiveError> {
    let source_url = photo.source_url.as_deref().unwrap_or_default();

    ctx.limiter
        .create_dir_all(dir)
        .await
        .map_err(|source| StorageError::io(dir, source))?;

    let image_path = dir.join(photo_file_name(photo.id, photo_extension(source_url)));
    download(
        ctx.client.http(),
        &ctx.limiter,
        source_url,
        &image_path,
        ctx.probe_before_download,
    )
    .await?;

    let caption_path = dir.join(caption_file_name(photo.id));
    ctx.limiter
        .write(&caption_path, &photo.caption)
        .await
        .map_err(|source| StorageError::io(&caption_path, source))?;

    Ok(image_path)
}

/// Downloads `url` into `path`
///
/// With `probe` set a HEAD request goes out first; its outcome is only
/// logged. A non-success GET status writes nothing. The body is received in
/// full before a limiter permit is taken, so a stalled download never holds
/// up filesystem work of other posts.
pub async fn download(
    client: &Client,
    limiter: &FileLimiter,
    url: &str,
    path: &Path,
    probe: bool,
) -> Result<(), ArchiveError> {
    if probe {
        match client.head(url).send().await {
            Ok(response) => tracing::debug!("HEAD {} -> {}", url, response.status()),
            Err(e) => tracing::debug!("HEAD {} failed: {}", url, e),
        }
    }

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ArchiveError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ArchiveError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|source| ArchiveError::Http {
        url: url.to_string(),
        source,
    })?;

    limiter
        .write(path, &body)
        .await
        .map_err(|source| StorageError::io(path, source))?;

    Ok(())
}
