//! Job error taxonomy
//!
//! Every failure a job can end in is one of the closed [`JobErrorKind`]
//! variants, each paired with a human-readable detail string.

use crate::credits::looks_like_credit_exhaustion;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of failure for a single analysis job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobErrorKind {
    /// No access credential configured
    NoCredential,
    /// Resource does not exist
    NotFound,
    /// Resource extension is not in the allow-list
    UnsupportedFormat,
    /// Resource exceeds the size cap
    TooLarge,
    /// Resource exists but could not be opened
    ResourceUnreadable,
    /// Resource opened but contained no bytes
    ResourceEmpty,
    /// Resource opened but reading its bytes failed
    ResourceReadError,
    /// Network-level failure (retryable inside a polling loop)
    TransportFailure,
    /// Non-2xx submit status with no service error message
    HttpStatus,
    /// A single undecodable response body
    MalformedResponse,
    /// Too many consecutive undecodable poll responses for one job
    PersistentMalformedResponse,
    /// The remote service explicitly rejected the request or job
    ServiceReportedError,
    /// Job completed without any usable generated content
    EmptyResult,
    /// Response shape not covered by the protocol
    UnexpectedResponseShape,
    /// Round budget exhausted while the job was still pending
    Timeout,
}

impl JobErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobErrorKind::NoCredential => "no_credential",
            JobErrorKind::NotFound => "not_found",
            JobErrorKind::UnsupportedFormat => "unsupported_format",
            JobErrorKind::TooLarge => "too_large",
            JobErrorKind::ResourceUnreadable => "resource_unreadable",
            JobErrorKind::ResourceEmpty => "resource_empty",
            JobErrorKind::ResourceReadError => "resource_read_error",
            JobErrorKind::TransportFailure => "transport_failure",
            JobErrorKind::HttpStatus => "http_status",
            JobErrorKind::MalformedResponse => "malformed_response",
            JobErrorKind::PersistentMalformedResponse => "persistent_malformed_response",
            JobErrorKind::ServiceReportedError => "service_reported_error",
            JobErrorKind::EmptyResult => "empty_result",
            JobErrorKind::UnexpectedResponseShape => "unexpected_response_shape",
            JobErrorKind::Timeout => "timeout",
        }
    }

    /// Kinds a polling loop absorbs and retries on the next round
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            JobErrorKind::TransportFailure | JobErrorKind::MalformedResponse
        )
    }
}

impl fmt::Display for JobErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal failure of one job
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {detail}")]
pub struct JobError {
    pub kind: JobErrorKind,
    pub detail: String,
    /// Credit balance reported alongside the failure, if any
    pub credits: Option<i64>,
}

impl JobError {
    pub fn new(kind: JobErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            credits: None,
        }
    }

    pub fn with_credits(mut self, credits: Option<i64>) -> Self {
        if credits.is_some() {
            self.credits = credits;
        }
        self
    }

    pub fn no_credential() -> Self {
        Self::new(
            JobErrorKind::NoCredential,
            "no API key configured for the analysis service",
        )
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(JobErrorKind::TransportFailure, detail)
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::new(JobErrorKind::ServiceReportedError, message)
    }

    pub fn timeout(last_error: Option<String>) -> Self {
        Self::new(JobErrorKind::Timeout, last_error.unwrap_or_default())
    }

    /// Whether the service rejected this job because the account ran out of credits.
    ///
    /// Only [`JobErrorKind::ServiceReportedError`] can qualify; see
    /// [`looks_like_credit_exhaustion`] for the text heuristic.
    pub fn is_credit_exhaustion(&self) -> bool {
        self.kind == JobErrorKind::ServiceReportedError && looks_like_credit_exhaustion(&self.detail)
    }
}
