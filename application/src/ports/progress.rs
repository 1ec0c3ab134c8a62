//! Progress notification port
//!
//! Defines the interface for reporting progress while jobs are submitted and polled.

use captionkit_domain::JobStatus;

/// Callback for progress updates during a batch
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain log lines, etc.)
pub trait PollProgressNotifier: Send + Sync {
    /// Called after each submission; `pending` is true when the job needs polling
    fn on_submitted(&self, _key: &str, _pending: bool) {}

    /// Called when a polling round starts
    fn on_round_start(&self, _round: u32, _pending: usize) {}

    /// Called when a job reaches a terminal state
    fn on_job_resolved(&self, _key: &str, _status: JobStatus) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl PollProgressNotifier for NoProgress {}
