//! Remote API module
//!
//! This module contains the VK API client and the wire types it decodes:
//! - Wall batches, with the total post count carried as its own field
//! - Posts and their photo/link attachments
//! - Author profiles

mod client;
mod types;

pub use client::{build_http_client, VkClient};
pub use types::{parse_profiles, Attachment, Author, Photo, Post, RemoteError, WallPage};

use thiserror::Error;

/// Errors returned by the remote API layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid JSON in response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Remote error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}
