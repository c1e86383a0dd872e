//! Author id to display name mapping
//!
//! Populated once before materialization and read-only afterwards. Any id
//! that was not resolved maps to [`ANONYMOUS`].

use crate::api::{Author, VkClient};
use std::collections::HashMap;

/// Display name used for unsigned posts and unresolved authors
pub const ANONYMOUS: &str = "Anonymous";

/// Resolved authors keyed by id
#[derive(Debug, Clone, Default)]
pub struct AuthorDirectory {
    authors: HashMap<i64, Author>,
}

impl AuthorDirectory {
    /// Creates an empty directory (every lookup is anonymous)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_authors(authors: impl IntoIterator<Item = Author>) -> Self {
        Self {
            authors: authors.into_iter().map(|a| (a.id, a)).collect(),
        }
    }

    /// Resolves author ids with a single remote call
    ///
    /// No call is made for an empty id list. A failed call is logged and
    /// leaves the directory empty; the run continues with anonymous names.
    pub async fn resolve(client: &VkClient, author_ids: &[i64]) -> Self {
        if author_ids.is_empty() {
            return Self::empty();
        }

        tracing::info!("Fetching authors info for {} ids...", author_ids.len());
        match client.get_profiles(author_ids).await {
            Ok(authors) => {
                let directory = Self::from_authors(authors);
                tracing::info!("...done, resolved {} authors", directory.len());
                directory
            }
            Err(e) => {
                tracing::error!("Failed to resolve authors, names default to {}: {}", ANONYMOUS, e);
                Self::empty()
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&Author> {
        self.authors.get(&id)
    }

    /// Display name for a signer, falling back to [`ANONYMOUS`]
    pub fn display_name(&self, signer_id: Option<i64>) -> String {
        signer_id
            .and_then(|id| self.get(id))
            .map(Author::display_name)
            .unwrap_or_else(|| ANONYMOUS.to_string())
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}
