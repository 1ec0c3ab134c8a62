//! Domain layer for captionkit
//!
//! This crate contains the core types and pure logic of the remote-job client.
//! It has no dependencies on networking, filesystems or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Jobs
//!
//! An [`AnalysisRequest`] submitted to the analysis service either resolves
//! immediately or yields a [`JobHandle`] that must be polled. Every job ends
//! as a [`JobOutcome`]: a [`JobResult`] or a [`JobError`] of a closed
//! [`JobErrorKind`].
//!
//! ## Protocol boundary
//!
//! Raw bodies are decoded once into a [`ParsedResponse`]; [`resolve_completed`]
//! extracts text, source and credits from completed payloads.
//!
//! ## Polling
//!
//! [`PollSession`] is the per-job state machine that decides, from one
//! observation per round, which jobs are resolved, still pending or timed out.

pub mod analysis;
pub mod core;
pub mod credits;
pub mod job;
pub mod polling;
pub mod protocol;

// Re-export commonly used types
pub use analysis::{
    request::{AnalysisRequest, Feature, FeatureSet, Instruction, Role},
    resource::{DEFAULT_MAX_RESOURCE_BYTES, mime_type_for, supported_extensions, validate_resource},
};
pub use core::{
    error::{JobError, JobErrorKind},
    string::truncate_at_word_boundary,
};
pub use credits::looks_like_credit_exhaustion;
pub use job::{
    handle::{JobHandle, JobKey},
    result::{JobOutcome, JobResult, JobStatus, SubmitOutcome, outcome_credits},
};
pub use polling::session::{
    DEFAULT_MALFORMED_LIMIT, PollObservation, PollReport, PollSession, Transition,
};
pub use protocol::{
    extract::{Extraction, extract, resolve_completed},
    response::{CompletedPayload, GeneratedItem, ParsedResponse, parse_account_credits},
};
