//! Job results and submission outcomes

use super::handle::JobHandle;
use crate::core::error::JobError;
use serde::{Deserialize, Serialize};

/// Text generated by a completed job. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub generated_text: String,
    /// Backend the service attributes the text to
    pub source_model: Option<String>,
    pub remaining_credits: Option<i64>,
}

impl JobResult {
    pub fn new(generated_text: impl Into<String>) -> Self {
        Self {
            generated_text: generated_text.into(),
            source_model: None,
            remaining_credits: None,
        }
    }

    pub fn with_source_model(mut self, source: Option<String>) -> Self {
        self.source_model = source;
        self
    }

    pub fn with_credits(mut self, credits: Option<i64>) -> Self {
        self.remaining_credits = credits;
        self
    }
}

/// Final state of one job: resolved text or a typed failure
pub type JobOutcome = Result<JobResult, JobError>;

/// Status label for a resolved job, as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Error,
}

impl JobStatus {
    pub fn of(outcome: &JobOutcome) -> Self {
        match outcome {
            Ok(_) => JobStatus::Success,
            Err(_) => JobStatus::Error,
        }
    }
}

/// Credit balance attached to an outcome, on either branch
pub fn outcome_credits(outcome: &JobOutcome) -> Option<i64> {
    match outcome {
        Ok(result) => result.remaining_credits,
        Err(error) => error.credits,
    }
}

/// What a single submission produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service answered with final assets right away
    Immediate(JobResult),
    /// The service accepted the job; poll the handle for the result
    Pending(JobHandle),
    /// Submission failed; no polling will happen
    Error(JobError),
}

impl From<JobOutcome> for SubmitOutcome {
    fn from(outcome: JobOutcome) -> Self {
        match outcome {
            Ok(result) => SubmitOutcome::Immediate(result),
            Err(error) => SubmitOutcome::Error(error),
        }
    }
}
