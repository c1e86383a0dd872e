//! Bounded filesystem access
//!
//! Thousands of small writes can be triggered at once when a batch fans out
//! into posts and attachments. Every filesystem call goes through a
//! [`FileLimiter`], which caps the number of operations in flight with a
//! semaphore so the process never runs out of file descriptors. Network I/O
//! is not limited here; a permit is only held while a call touches the disk.

use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Shared cap on concurrent filesystem operations
#[derive(Debug, Clone)]
pub struct FileLimiter {
    semaphore: Arc<Semaphore>,
}

impl FileLimiter {
    /// Creates a limiter allowing `max_open` operations at a time
    pub fn new(max_open: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_open)),
        }
    }

    /// Number of operations that could start right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    async fn permit(&self) -> io::Result<OwnedSemaphorePermit> {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    /// Recursively creates a directory; succeeds if it already exists
    pub async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let _permit = self.permit().await?;
        tokio::fs::create_dir_all(path).await
    }

    /// Writes a whole file, replacing any previous content
    pub async fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
        let _permit = self.permit().await?;
        tokio::fs::write(path, contents).await
    }

    /// Reads a whole file as UTF-8
    pub async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let _permit = self.permit().await?;
        tokio::fs::read_to_string(path).await
    }

    /// Lists the regular files of a directory, sorted by name
    pub async fn list_files(&self, path: &Path) -> io::Result<Vec<String>> {
        let _permit = self.permit().await?;

        let mut entries = tokio::fs::read_dir(path).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        Ok(names)
    }

    /// Renames a file or directory
    pub async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let _permit = self.permit().await?;
        tokio::fs::rename(from, to).await
    }

    /// Removes a directory and everything below it; a missing directory is fine
    pub async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let _permit = self.permit().await?;
        match tokio::fs::remove_dir_all(path).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
