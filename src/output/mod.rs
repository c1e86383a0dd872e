//! Output module for the materialized archive
//!
//! This module handles:
//! - Deriving directory and file names from post metadata
//! - Composing the `text.txt` body of a post
//! - Recording and printing run statistics

pub mod layout;
pub mod stats;

pub use layout::{permalink, post_text, pretty_date, ArchiveLayout};
pub use stats::{print_statistics, ArchiveSummary, RunEvent, RunStatistics};
