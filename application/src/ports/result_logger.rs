//! Port for structured job logging.
//!
//! Defines the [`ResultLogger`] trait for recording job lifecycle events
//! (submission, resolution, batch summary) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures every job
//! outcome in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured job event for logging.
pub struct JobEvent {
    /// Event type identifier (e.g., "job_submitted", "job_resolved").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl JobEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging job events to a structured log.
///
/// `log` is synchronous and non-fallible; logging failures never affect a batch.
pub trait ResultLogger: Send + Sync {
    fn log(&self, event: JobEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoResultLogger;

impl ResultLogger for NoResultLogger {
    fn log(&self, _event: JobEvent) {}
}
