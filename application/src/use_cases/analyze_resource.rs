//! Analyze Resource use case
//!
//! Batch entry point for callers: submits several keyed requests (usually
//! different roles for the same image), resolves the ones that came back
//! pending through one shared poll session, and returns every outcome keyed
//! by the caller's own identifiers.

use super::poll_jobs::PollJobsUseCase;
use super::submit_job::SubmitJobUseCase;
use crate::ports::analysis_service::AnalysisService;
use crate::ports::progress::{NoProgress, PollProgressNotifier};
use crate::ports::resource_source::ResourceSource;
use crate::ports::result_logger::{JobEvent, ResultLogger};
use captionkit_domain::{
    AnalysisRequest, JobHandle, JobKey, JobOutcome, JobStatus, SubmitOutcome, outcome_credits,
};
use futures::future::join_all;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the AnalyzeResource use case
#[derive(Debug, Clone)]
pub struct AnalyzeInput<K: JobKey> {
    /// Requests keyed by caller-assigned identifiers; a repeated key keeps the last request
    pub requests: Vec<(K, AnalysisRequest)>,
    /// Round budget for this batch (`None` uses the configured default)
    pub max_rounds: Option<u32>,
}

impl<K: JobKey> AnalyzeInput<K> {
    pub fn new(requests: Vec<(K, AnalysisRequest)>) -> Self {
        Self {
            requests,
            max_rounds: None,
        }
    }

    /// Cap the number of polling rounds, e.g. inside a short-lived upload hook
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }
}

/// Outcomes of one batch
#[derive(Debug, Clone)]
pub struct BatchOutcome<K: JobKey> {
    pub outcomes: BTreeMap<K, JobOutcome>,
    /// Polling rounds issued (0 when nothing needed polling)
    pub rounds: u32,
}

impl<K: JobKey> BatchOutcome<K> {
    /// Lowest credit balance reported by any exchange in the batch.
    ///
    /// Jobs finish in no fixed order, so the lowest balance is the most recent one.
    pub fn remaining_credits(&self) -> Option<i64> {
        self.outcomes.values().filter_map(outcome_credits).min()
    }

    /// True if any job was rejected for lack of credits; callers should stop
    /// submitting further batches.
    pub fn credits_exhausted(&self) -> bool {
        self.outcomes
            .values()
            .any(|o| o.as_ref().is_err_and(|e| e.is_credit_exhaustion()))
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_ok()).count()
    }
}

/// Use case for analyzing one resource with several requests
pub struct AnalyzeResourceUseCase<S: AnalysisService + 'static, R: ResourceSource + 'static> {
    submitter: SubmitJobUseCase<S, R>,
    poller: PollJobsUseCase<S>,
    logger: Arc<dyn ResultLogger>,
}

impl<S: AnalysisService + 'static, R: ResourceSource + 'static> AnalyzeResourceUseCase<S, R> {
    pub fn new(
        submitter: SubmitJobUseCase<S, R>,
        poller: PollJobsUseCase<S>,
        logger: Arc<dyn ResultLogger>,
    ) -> Self {
        Self {
            submitter,
            poller,
            logger,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute<K: JobKey>(&self, input: AnalyzeInput<K>) -> BatchOutcome<K> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress<K: JobKey>(
        &self,
        input: AnalyzeInput<K>,
        progress: &dyn PollProgressNotifier,
    ) -> BatchOutcome<K> {
        let requests: BTreeMap<K, AnalysisRequest> = input.requests.into_iter().collect();
        info!("Submitting {} request(s)", requests.len());

        let submissions = join_all(requests.iter().map(|(key, request)| async move {
            (key.clone(), self.submitter.execute(request).await)
        }))
        .await;

        let mut outcomes: BTreeMap<K, JobOutcome> = BTreeMap::new();
        let mut pending: BTreeMap<K, JobHandle> = BTreeMap::new();

        for (key, submitted) in submissions {
            let resource = requests
                .get(&key)
                .map(|r| r.resource().display().to_string())
                .unwrap_or_default();
            self.logger.log(JobEvent::new(
                "job_submitted",
                json!({
                    "key": key.to_string(),
                    "resource": resource,
                    "outcome": submit_label(&submitted),
                }),
            ));
            progress.on_submitted(&key.to_string(), matches!(submitted, SubmitOutcome::Pending(_)));

            match submitted {
                SubmitOutcome::Immediate(result) => {
                    progress.on_job_resolved(&key.to_string(), JobStatus::Success);
                    outcomes.insert(key, Ok(result));
                }
                SubmitOutcome::Pending(handle) => {
                    pending.insert(key, handle);
                }
                SubmitOutcome::Error(error) => {
                    warn!("Submission {} failed: {}", key, error);
                    progress.on_job_resolved(&key.to_string(), JobStatus::Error);
                    outcomes.insert(key, Err(error));
                }
            }
        }

        let mut rounds = 0;
        if !pending.is_empty() {
            let report = self
                .poller
                .poll_many_with_progress(pending, input.max_rounds, progress)
                .await;
            rounds = report.rounds;
            outcomes.extend(report.outcomes);
        }

        for (key, outcome) in &outcomes {
            self.logger.log(JobEvent::new("job_resolved", resolved_payload(key, outcome)));
        }

        let batch = BatchOutcome { outcomes, rounds };
        self.logger.log(JobEvent::new(
            "batch_finished",
            json!({
                "jobs": batch.outcomes.len(),
                "succeeded": batch.success_count(),
                "rounds": batch.rounds,
                "credits": batch.remaining_credits(),
                "credits_exhausted": batch.credits_exhausted(),
            }),
        ));
        info!(
            "Batch finished: {}/{} succeeded in {} round(s)",
            batch.success_count(),
            batch.outcomes.len(),
            batch.rounds
        );
        batch
    }
}

fn submit_label(outcome: &SubmitOutcome) -> &'static str {
    match outcome {
        SubmitOutcome::Immediate(_) => "immediate",
        SubmitOutcome::Pending(_) => "pending",
        SubmitOutcome::Error(_) => "error",
    }
}

fn resolved_payload<K: JobKey>(key: &K, outcome: &JobOutcome) -> serde_json::Value {
    match outcome {
        Ok(result) => json!({
            "key": key.to_string(),
            "status": JobStatus::Success,
            "text": result.generated_text,
            "source": result.source_model,
            "credits": result.remaining_credits,
        }),
        Err(error) => json!({
            "key": key.to_string(),
            "status": JobStatus::Error,
            "kind": error.kind,
            "detail": error.detail,
            "credits": error.credits,
        }),
    }
}
