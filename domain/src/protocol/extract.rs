//! Result extraction from completed payloads.
//!
//! Extraction does not care which caller feature asked for the job: the first
//! generated item's text and source, plus the credit balance, are all it reads.

use super::response::CompletedPayload;
use crate::core::error::{JobError, JobErrorKind};
use crate::job::result::{JobOutcome, JobResult};

/// Fields read from a completed payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: Option<String>,
    pub source: Option<String>,
    pub credits: Option<i64>,
    /// Service diagnostics joined with "; ", if any
    pub detail: Option<String>,
}

/// Read text, source, credits and diagnostics from a completed payload.
pub fn extract(payload: &CompletedPayload) -> Extraction {
    let first = payload.items.first();
    let detail = (!payload.messages.is_empty()).then(|| payload.messages.join("; "));

    Extraction {
        text: first.and_then(|item| item.text.clone()),
        source: first.and_then(|item| item.source.clone()),
        credits: payload.credits,
        detail,
    }
}

/// Turn a completed payload into a job outcome.
///
/// Generated text resolves to success; a completed job with no text resolves
/// to [`JobErrorKind::EmptyResult`] carrying the joined diagnostics.
pub fn resolve_completed(payload: &CompletedPayload) -> JobOutcome {
    let extraction = extract(payload);
    match extraction.text {
        Some(text) => Ok(JobResult::new(text)
            .with_source_model(extraction.source)
            .with_credits(extraction.credits)),
        None => Err(JobError::new(
            JobErrorKind::EmptyResult,
            extraction.detail.unwrap_or_default(),
        )
        .with_credits(extraction.credits)),
    }
}
