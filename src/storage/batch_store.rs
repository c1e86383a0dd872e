//! Durable cache of raw wall batches
//!
//! Each batch is stored verbatim as `batch_{offset}.txt`. Batches of a fetch
//! in progress go to a sibling staging directory (`<dir>.partial`), which is
//! renamed to the cache directory once the last batch is written. The
//! presence of the cache directory is the "already fetched" signal.

use crate::storage::{FileLimiter, StorageError, StorageResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name of the batch starting at `offset`
pub fn batch_file_name(offset: u64) -> String {
    format!("batch_{}.txt", offset)
}

/// Directory-backed batch cache
#[derive(Debug, Clone)]
pub struct BatchStore {
    dir: PathBuf,
    limiter: FileLimiter,
}

impl BatchStore {
    pub fn new(dir: impl Into<PathBuf>, limiter: FileLimiter) -> Self {
        Self {
            dir: dir.into(),
            limiter,
        }
    }

    /// The cache directory
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// The directory batches are written to while a fetch is in progress
    pub fn staging_path(&self) -> PathBuf {
        let mut name = self
            .dir
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("batches"));
        name.push(".partial");
        self.dir.with_file_name(name)
    }

    /// Returns true when a completed fetch is cached
    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// Starts writing a new fetch into the staging directory
    ///
    /// Batches left in the staging directory by an interrupted run are
    /// discarded, so a commit publishes exactly the batches of this fetch.
    pub async fn begin(&self) -> StorageResult<BatchWriter> {
        if self.exists() {
            return Err(StorageError::AlreadyComplete(self.dir.clone()));
        }

        let staging = self.staging_path();
        self.limiter
            .remove_dir_all(&staging)
            .await
            .map_err(|source| StorageError::io(&staging, source))?;
        self.limiter
            .create_dir_all(&staging)
            .await
            .map_err(|source| StorageError::io(&staging, source))?;

        Ok(BatchWriter {
            staging,
            target: self.dir.clone(),
            limiter: self.limiter.clone(),
            written: 0,
        })
    }

    /// Lists the batch files in the cache
    ///
    /// No order is implied; every batch is self-contained.
    pub async fn list_entries(&self) -> StorageResult<Vec<String>> {
        if !self.exists() {
            return Err(StorageError::Missing(self.dir.clone()));
        }

        self.limiter
            .list_files(&self.dir)
            .await
            .map_err(|source| StorageError::io(&self.dir, source))
    }

    /// Reads the raw body of one batch file
    pub async fn read(&self, name: &str) -> StorageResult<String> {
        let path = self.dir.join(name);
        self.limiter
            .read_to_string(&path)
            .await
            .map_err(|source| StorageError::io(&path, source))
    }
}

/// Writes the batches of one fetch and publishes them on commit
#[derive(Debug)]
pub struct BatchWriter {
    staging: PathBuf,
    target: PathBuf,
    limiter: FileLimiter,
    written: usize,
}

impl BatchWriter {
    /// Persists the raw body of the batch starting at `offset`
    pub async fn write(&mut self, offset: u64, raw_body: &str) -> StorageResult<()> {
        let path = self.staging.join(batch_file_name(offset));
        self.limiter
            .write(&path, raw_body)
            .await
            .map_err(|source| StorageError::io(&path, source))?;
        self.written += 1;
        Ok(())
    }

    /// Number of batches written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Moves the staging directory into place as the completed cache
    pub async fn commit(self) -> StorageResult<()> {
        self.limiter
            .rename(&self.staging, &self.target)
            .await
            .map_err(|source| StorageError::io(&self.target, source))
    }
}
