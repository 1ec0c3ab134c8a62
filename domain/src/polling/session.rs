//! Per-job poll state machine.
//!
//! A [`PollSession`] owns the pending handles of one polling run plus the
//! per-job bookkeeping (last transient error, consecutive malformed count).
//! It performs no I/O: the driver feeds it one [`PollObservation`] per pending
//! job per round and it decides which jobs are resolved.

use crate::core::error::{JobError, JobErrorKind};
use crate::job::handle::{JobHandle, JobKey};
use crate::job::result::{JobOutcome, JobStatus};
use crate::protocol::extract::resolve_completed;
use crate::protocol::response::ParsedResponse;
use std::collections::BTreeMap;

/// Consecutive malformed responses after which a job is abandoned
pub const DEFAULT_MALFORMED_LIMIT: u32 = 5;

/// What one poll call produced for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollObservation {
    /// The call never produced a body (connect error, timeout, reset)
    TransportFailure(String),
    /// The call returned a body, already classified
    Response(ParsedResponse),
}

/// Effect of one observation on a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pending,
    Resolved(JobStatus),
}

/// Outcome of a finished polling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport<K: JobKey> {
    pub outcomes: BTreeMap<K, JobOutcome>,
    /// Rounds actually issued
    pub rounds: u32,
}

/// In-memory state for one polling run
#[derive(Debug)]
pub struct PollSession<K: JobKey> {
    pending: BTreeMap<K, JobHandle>,
    last_errors: BTreeMap<K, String>,
    malformed_streaks: BTreeMap<K, u32>,
    resolved: BTreeMap<K, JobOutcome>,
    rounds: u32,
    malformed_limit: u32,
}

impl<K: JobKey> PollSession<K> {
    pub fn new(handles: BTreeMap<K, JobHandle>, malformed_limit: u32) -> Self {
        Self {
            pending: handles,
            last_errors: BTreeMap::new(),
            malformed_streaks: BTreeMap::new(),
            resolved: BTreeMap::new(),
            rounds: 0,
            malformed_limit: malformed_limit.max(1),
        }
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Start a new round and return every job still pending.
    pub fn begin_round(&mut self) -> Vec<(K, JobHandle)> {
        self.rounds += 1;
        self.pending
            .iter()
            .map(|(key, handle)| (key.clone(), handle.clone()))
            .collect()
    }

    /// Apply one observation to a pending job.
    ///
    /// Returns `None` if the key is not pending (unknown or already resolved).
    pub fn observe(&mut self, key: &K, observation: PollObservation) -> Option<Transition> {
        if !self.pending.contains_key(key) {
            return None;
        }

        let response = match observation {
            PollObservation::TransportFailure(detail) => {
                self.last_errors.insert(key.clone(), detail);
                return Some(Transition::Pending);
            }
            PollObservation::Response(response) => response,
        };

        if !matches!(response, ParsedResponse::Malformed { .. }) {
            self.malformed_streaks.remove(key);
        }

        let outcome = match response {
            ParsedResponse::Malformed { detail } => return Some(self.record_malformed(key, detail)),
            ParsedResponse::ServiceError { message, credits } => {
                Err(JobError::service(message).with_credits(credits))
            }
            ParsedResponse::Completed(payload) => resolve_completed(&payload),
            ParsedResponse::InProgress {
                status: Some(_), ..
            } => return Some(Transition::Pending),
            ParsedResponse::InProgress { status: None, .. } => Err(JobError::new(
                JobErrorKind::UnexpectedResponseShape,
                "poll response carried a handle but no status",
            )),
            ParsedResponse::Unrecognized { detail, credits } => Err(JobError::new(
                JobErrorKind::UnexpectedResponseShape,
                detail,
            )
            .with_credits(credits)),
        };

        Some(self.resolve(key, outcome))
    }

    /// End the run: every job still pending becomes a timeout carrying its
    /// last transient error, if one was seen.
    pub fn finish(mut self) -> PollReport<K> {
        for key in std::mem::take(&mut self.pending).into_keys() {
            let last_error = self.last_errors.remove(&key);
            self.resolved.insert(key, Err(JobError::timeout(last_error)));
        }
        PollReport {
            outcomes: self.resolved,
            rounds: self.rounds,
        }
    }

    fn record_malformed(&mut self, key: &K, detail: String) -> Transition {
        let streak = self.malformed_streaks.entry(key.clone()).or_insert(0);
        *streak += 1;
        let streak = *streak;
        let detail = format!("malformed response: {detail}");

        if streak >= self.malformed_limit {
            let error = JobError::new(
                JobErrorKind::PersistentMalformedResponse,
                format!("{streak} consecutive malformed responses; last: {detail}"),
            );
            return self.resolve(key, Err(error));
        }
        self.last_errors.insert(key.clone(), detail);
        Transition::Pending
    }

    fn resolve(&mut self, key: &K, outcome: JobOutcome) -> Transition {
        self.pending.remove(key);
        self.malformed_streaks.remove(key);
        self.last_errors.remove(key);
        let status = JobStatus::of(&outcome);
        self.resolved.insert(key.clone(), outcome);
        Transition::Resolved(status)
    }
}
