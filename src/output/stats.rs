//! Run statistics
//!
//! Counters are updated concurrently by batch, post and attachment tasks and
//! read once at the end of the run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by all tasks of a run
#[derive(Debug, Default)]
pub struct RunStatistics {
    batches_fetched: AtomicU64,
    batches_read: AtomicU64,
    batches_skipped: AtomicU64,
    posts_written: AtomicU64,
    reposts_skipped: AtomicU64,
    posts_failed: AtomicU64,
    photos_downloaded: AtomicU64,
    links_written: AtomicU64,
    attachments_failed: AtomicU64,
    attachments_ignored: AtomicU64,
}

/// Kinds of events counted during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    BatchFetched,
    BatchRead,
    BatchSkipped,
    PostWritten,
    RepostSkipped,
    PostFailed,
    PhotoDownloaded,
    LinkWritten,
    AttachmentFailed,
    AttachmentIgnored,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub batches_fetched: u64,
    pub batches_read: u64,
    pub batches_skipped: u64,
    pub posts_written: u64,
    pub reposts_skipped: u64,
    pub posts_failed: u64,
    pub photos_downloaded: u64,
    pub links_written: u64,
    pub attachments_failed: u64,
    pub attachments_ignored: u64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: RunEvent) {
        let counter = match event {
            RunEvent::BatchFetched => &self.batches_fetched,
            RunEvent::BatchRead => &self.batches_read,
            RunEvent::BatchSkipped => &self.batches_skipped,
            RunEvent::PostWritten => &self.posts_written,
            RunEvent::RepostSkipped => &self.reposts_skipped,
            RunEvent::PostFailed => &self.posts_failed,
            RunEvent::PhotoDownloaded => &self.photos_downloaded,
            RunEvent::LinkWritten => &self.links_written,
            RunEvent::AttachmentFailed => &self.attachments_failed,
            RunEvent::AttachmentIgnored => &self.attachments_ignored,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> ArchiveSummary {
        ArchiveSummary {
            batches_fetched: self.batches_fetched.load(Ordering::Relaxed),
            batches_read: self.batches_read.load(Ordering::Relaxed),
            batches_skipped: self.batches_skipped.load(Ordering::Relaxed),
            posts_written: self.posts_written.load(Ordering::Relaxed),
            reposts_skipped: self.reposts_skipped.load(Ordering::Relaxed),
            posts_failed: self.posts_failed.load(Ordering::Relaxed),
            photos_downloaded: self.photos_downloaded.load(Ordering::Relaxed),
            links_written: self.links_written.load(Ordering::Relaxed),
            attachments_failed: self.attachments_failed.load(Ordering::Relaxed),
            attachments_ignored: self.attachments_ignored.load(Ordering::Relaxed),
        }
    }
}

impl ArchiveSummary {
    /// Total number of units that failed and were skipped
    pub fn total_errors(&self) -> u64 {
        self.batches_skipped + self.posts_failed + self.attachments_failed
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The statistics to display
pub fn print_statistics(summary: &ArchiveSummary) {
    println!("=== Archive Statistics ===\n");

    println!("Batches:");
    println!("  Fetched: {}", summary.batches_fetched);
    println!("  Read: {}", summary.batches_read);
    println!("  Skipped (unreadable): {}", summary.batches_skipped);
    println!();

    println!("Posts:");
    println!("  Written: {}", summary.posts_written);
    println!("  Reposts skipped: {}", summary.reposts_skipped);
    println!("  Failed: {}", summary.posts_failed);
    println!();

    println!("Attachments:");
    println!("  Photos downloaded: {}", summary.photos_downloaded);
    println!("  Links written: {}", summary.links_written);
    println!("  Failed: {}", summary.attachments_failed);
    println!("  Ignored (other types): {}", summary.attachments_ignored);
    println!();

    let processed = summary.posts_written + summary.posts_failed;
    let success_rate = if processed > 0 {
        (summary.posts_written as f64 / processed as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} posts written)",
        success_rate, summary.posts_written, processed
    );
}
