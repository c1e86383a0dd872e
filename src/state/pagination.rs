//! Pagination state machine for downloading a wall
//!
//! The first call asks for `discovery-count` posts only to learn the total,
//! every later call asks for `page-size` posts. Paging stops once the
//! cumulative offset reaches the total reported by the first response.
use crate::config::PagingConfig;
use std::fmt;

/// Current phase of a wall download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    /// No response seen yet; the total is unknown
    Discovering,

    /// Total known; the next batch starts at `offset`
    Paging { offset: u64, total: u64 },

    /// Every batch has been fetched and persisted
    Done { total: u64, batches: usize },

    /// A fetch or write failed at `offset`
    Failed { offset: u64 },
}

impl PaginationState {
    /// Returns true once no further requests will be issued
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed { .. })
    }
}

impl fmt::Display for PaginationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovering => write!(f, "discovering"),
            Self::Paging { offset, total } => write!(f, "paging ({}/{})", offset, total),
            Self::Done { total, batches } => {
                write!(f, "done ({} posts in {} batches)", total, batches)
            }
            Self::Failed { offset } => write!(f, "failed at offset {}", offset),
        }
    }
}

/// One `wall.get` call to issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub count: u32,
}

/// Drives [`PaginationState`] from batch results
#[derive(Debug, Clone)]
pub struct Pagination {
    state: PaginationState,
    discovery_count: u32,
    page_size: u32,
    batches: usize,
}

impl Pagination {
    pub fn new(config: &PagingConfig) -> Self {
        Self {
            state: PaginationState::Discovering,
            discovery_count: config.discovery_count,
            page_size: config.page_size,
            batches: 0,
        }
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// The next call to make, or `None` once terminal
    pub fn next_request(&self) -> Option<PageRequest> {
        match self.state {
            PaginationState::Discovering => Some(PageRequest {
                offset: 0,
                count: self.discovery_count,
            }),
            PaginationState::Paging { offset, .. } => Some(PageRequest {
                offset,
                count: self.page_size,
            }),
            PaginationState::Done { .. } | PaginationState::Failed { .. } => None,
        }
    }

    /// Records a persisted batch
    ///
    /// `reported_total` is only taken from the first response; later values
    /// are ignored so the loop always terminates.
    pub fn record_batch(&mut self, request: PageRequest, reported_total: u64) {
        let total = match self.state {
            PaginationState::Discovering => reported_total,
            PaginationState::Paging { total, .. } => total,
            PaginationState::Done { .. } | PaginationState::Failed { .. } => return,
        };

        self.batches += 1;
        let next_offset = request.offset + u64::from(request.count);

        self.state = if next_offset < total {
            PaginationState::Paging {
                offset: next_offset,
                total,
            }
        } else {
            PaginationState::Done {
                total,
                batches: self.batches,
            }
        };
    }

    /// Marks the download as failed at the pending request
    pub fn fail(&mut self) {
        let offset = self.next_request().map(|r| r.offset).unwrap_or_default();
        self.state = PaginationState::Failed { offset };
    }
}
