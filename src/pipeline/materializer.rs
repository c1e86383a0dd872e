//! Post materializer
//!
//! Reads every cached batch, and for each original post writes
//! `{result}/{author}/{date}_{id}/text.txt` before handing its attachments
//! to the attachment fetcher. Batches and posts are processed concurrently
//! with no ordering between siblings. A batch that cannot be read or decoded
//! is skipped without affecting the others, and so is a single post.

use crate::api::{Post, WallPage};
use crate::output::layout::TEXT_FILE_NAME;
use crate::output::{post_text, pretty_date, RunEvent};
use crate::pipeline::attachments::process_attachments;
use crate::pipeline::{join_all, ArchiveContext};
use crate::storage::{BatchStore, StorageError};
use crate::ArchiveError;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Materializes every batch in the store and waits for all work to finish
pub async fn process_all(ctx: Arc<ArchiveContext>, store: &BatchStore) -> Result<(), ArchiveError> {
    tracing::info!("Processing files in {}", store.path().display());

    let entries = store.list_entries().await?;
    let mut batches = JoinSet::new();
    for name in entries {
        batches.spawn(process_batch(Arc::clone(&ctx), store.clone(), name));
    }

    join_all(batches).await;
    Ok(())
}

/// Materializes the posts of one batch file
pub async fn process_batch(ctx: Arc<ArchiveContext>, store: BatchStore, name: String) {
    tracing::info!("Reading file... {}", name);

    let body = match store.read(&name).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Failed to read {}, skipping: {}", name, e);
            ctx.record(RunEvent::BatchSkipped);
            return;
        }
    };

    let page = match WallPage::parse(&body) {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Failed to parse {}, skipping: {}", name, e);
            ctx.record(RunEvent::BatchSkipped);
            return;
        }
    };
    ctx.record(RunEvent::BatchRead);

    let mut posts = JoinSet::new();
    for item in page.items {
        match Post::from_value(item) {
            Ok(post) => {
                posts.spawn(materialize_post(Arc::clone(&ctx), post));
            }
            Err(e) => {
                tracing::warn!("Failed to decode a post in {}, skipping: {}", name, e);
                ctx.record(RunEvent::PostFailed);
            }
        }
    }
    join_all(posts).await;
}

/// Writes one post and then its attachments
pub async fn materialize_post(ctx: Arc<ArchiveContext>, post: Post) {
    if !post.is_original() {
        tracing::info!("Post [{}] is a re-post, skipping", post.id);
        ctx.record(RunEvent::RepostSkipped);
        return;
    }

    let post_dir = match write_post(&ctx, &post).await {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!("Failed to write post {}: {}", post.id, e);
            ctx.record(RunEvent::PostFailed);
            return;
        }
    };
    ctx.record(RunEvent::PostWritten);

    if !post.attachments.is_empty() {
        process_attachments(ctx, post.attachments, post_dir).await;
    }
}

/// Creates the post directory and writes `text.txt`; returns the directory
async fn write_post(ctx: &ArchiveContext, post: &Post) -> Result<PathBuf, ArchiveError> {
    let author_name = ctx.authors.display_name(post.signer_id);
    let date = pretty_date(post.date).ok_or(ArchiveError::InvalidDate {
        post_id: post.id,
        date: post.date,
    })?;

    let post_dir = ctx.layout.post_dir(&author_name, &date, post.id);
    ctx.limiter
        .create_dir_all(&post_dir)
        .await
        .map_err(|source| StorageError::io(&post_dir, source))?;

    let text_path = post_dir.join(TEXT_FILE_NAME);
    ctx.limiter
        .write(&text_path, post_text(post, &author_name))
        .await
        .map_err(|source| StorageError::io(&text_path, source))?;

    Ok(post_dir)
}
