//! VK wall archive: a batch archiver for community wall posts
//!
//! This crate downloads every wall post of a group in offset-driven batches,
//! caches the raw batches on disk, resolves author ids to display names and
//! materializes each post (with its photo and link attachments) into a
//! per-author, per-date directory tree.

pub mod api;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for archive operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote API error: {0}")]
    Api(#[from] api::ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Post {post_id} has an out-of-range date: {date}")]
    InvalidDate { post_id: i64, date: i64 },

    #[error("Failed to serialize attachment: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pagination failed at offset {offset}: {source}")]
    Pagination {
        offset: u64,
        #[source]
        source: Box<ArchiveError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Wrong argument: {0}")]
    WrongArgument(String),
}

/// Result type alias for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, RunTarget};
pub use output::{pretty_date, RunStatistics};
pub use pipeline::{run_archive, Orchestrator};
