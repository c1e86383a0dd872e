//! State module for a single archive run
//!
//! # Components
//!
//! - `PaginationState`: Tracks the wall download (discovering, paging, done, failed)
//! - `AuthorDirectory`: Maps author ids to display names for the whole run

mod authors;
mod pagination;

// Re-export main types
pub use authors::{AuthorDirectory, ANONYMOUS};
pub use pagination::{PageRequest, Pagination, PaginationState};
