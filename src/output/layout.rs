//! Archive layout derivation
//!
//! Every path and file body of the archive is a pure function of post
//! metadata:
//!
//! ```text
//! {result}/{author}/{YYYY-MM-DD}_{post_id}/text.txt
//! {result}/{author}/{YYYY-MM-DD}_{post_id}/attachments/{photo_id}.{jpg|png}
//! {result}/{author}/{YYYY-MM-DD}_{post_id}/attachments/{photo_id}.txt
//! {result}/{author}/{YYYY-MM-DD}_{post_id}/attachments/link_{index}.txt
//! ```

use crate::api::Post;
use crate::state::ANONYMOUS;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Prefix of a post permalink; followed by `{from_id}_{post_id}`
pub const PERMALINK_BASE: &str = "https://vk.com/wall";

pub const TEXT_FILE_NAME: &str = "text.txt";
pub const ATTACHMENTS_DIR_NAME: &str = "attachments";

/// Formats epoch seconds as a zero-padded UTC `YYYY-MM-DD`
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn pretty_date(epoch_secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(epoch_secs, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Canonical link to a post
pub fn permalink(from_id: i64, post_id: i64) -> String {
    format!("{}{}_{}", PERMALINK_BASE, from_id, post_id)
}

/// Body of `text.txt`: the post text, an attribution line and the permalink
pub fn post_text(post: &Post, author_name: &str) -> String {
    format!(
        "{}\n Автор: {}\nVk link: {}",
        post.text,
        author_name,
        permalink(post.from_id, post.id)
    )
}

/// Makes a display name safe to use as a single directory name
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();

    match cleaned.trim() {
        "" | "." | ".." => ANONYMOUS.to_string(),
        _ => cleaned,
    }
}

/// Picks the image extension from the source URL
pub fn photo_extension(source_url: &str) -> &'static str {
    if source_url.contains(".jpg") {
        "jpg"
    } else {
        "png"
    }
}

pub fn photo_file_name(photo_id: i64, extension: &str) -> String {
    format!("{}.{}", photo_id, extension)
}

pub fn caption_file_name(photo_id: i64) -> String {
    format!("{}.txt", photo_id)
}

/// Link files are numbered by the attachment's position in the post
pub fn link_file_name(index: usize) -> String {
    format!("link_{}.txt", index)
}

pub fn attachments_dir(post_dir: &Path) -> PathBuf {
    post_dir.join(ATTACHMENTS_DIR_NAME)
}

/// Root of the materialized archive
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    root: PathBuf,
}

impl ArchiveLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `{root}/{author}/{date}_{post_id}`
    pub fn post_dir(&self, author_name: &str, pretty_date: &str, post_id: i64) -> PathBuf {
        self.root
            .join(sanitize_component(author_name))
            .join(format!("{}_{}", pretty_date, post_id))
    }
}
