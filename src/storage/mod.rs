//! Storage module for the raw batch cache
//!
//! This module handles:
//! - Persisting raw wall batches, one file per offset
//! - Publishing a fetch only once it is complete
//! - Capping concurrent filesystem operations

mod batch_store;
mod limiter;

pub use batch_store::{batch_file_name, BatchStore, BatchWriter};
pub use limiter::FileLimiter;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Batch cache already complete at {0}")]
    AlreadyComplete(PathBuf),

    #[error("Batch cache not found at {0}")]
    Missing(PathBuf),
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
