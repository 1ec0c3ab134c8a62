//! Poll Jobs use case
//!
//! Drives a set of pending jobs to completion with one shared round-robin
//! loop. Every still-pending job is polled once per round, concurrently, and
//! the loop pauses once between rounds. N jobs therefore cost roughly the
//! latency of the slowest one, not the sum.

use crate::config::{ClientConfig, Credential, PollParams};
use crate::ports::analysis_service::AnalysisService;
use crate::ports::pacer::Pacer;
use crate::ports::progress::{NoProgress, PollProgressNotifier};
use captionkit_domain::{
    JobError, JobErrorKind, JobHandle, JobKey, JobOutcome, JobStatus, ParsedResponse,
    PollObservation, PollReport, PollSession, Transition,
};
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for polling async jobs
pub struct PollJobsUseCase<S: AnalysisService + 'static> {
    service: Arc<S>,
    pacer: Arc<dyn Pacer>,
    config: ClientConfig,
    params: PollParams,
}

impl<S: AnalysisService + 'static> PollJobsUseCase<S> {
    pub fn new(
        service: Arc<S>,
        pacer: Arc<dyn Pacer>,
        config: ClientConfig,
        params: PollParams,
    ) -> Self {
        Self {
            service,
            pacer,
            config,
            params,
        }
    }

    pub fn params(&self) -> &PollParams {
        &self.params
    }

    /// Poll every handle until resolved or until `max_rounds` rounds have run
    /// (`None` uses the configured default).
    pub async fn poll_many<K: JobKey>(
        &self,
        handles: BTreeMap<K, JobHandle>,
        max_rounds: Option<u32>,
    ) -> PollReport<K> {
        self.poll_many_with_progress(handles, max_rounds, &NoProgress)
            .await
    }

    /// Poll a single handle; same loop as [`poll_many`](Self::poll_many).
    pub async fn poll_one(&self, handle: JobHandle, max_rounds: Option<u32>) -> JobOutcome {
        let mut report = self
            .poll_many(BTreeMap::from([("job".to_string(), handle)]), max_rounds)
            .await;
        report
            .outcomes
            .remove("job")
            .unwrap_or_else(|| Err(JobError::timeout(None)))
    }

    /// Poll with progress callbacks
    pub async fn poll_many_with_progress<K: JobKey>(
        &self,
        handles: BTreeMap<K, JobHandle>,
        max_rounds: Option<u32>,
        progress: &dyn PollProgressNotifier,
    ) -> PollReport<K> {
        let Some(credential) = &self.config.credential else {
            return PollReport {
                outcomes: handles
                    .into_keys()
                    .map(|key| (key, Err(JobError::no_credential())))
                    .collect(),
                rounds: 0,
            };
        };

        let max_rounds = max_rounds.unwrap_or(self.params.max_rounds);
        let mut session = PollSession::new(handles, self.params.malformed_limit);
        info!(
            "Polling {} job(s), up to {} round(s)",
            session.pending_count(),
            max_rounds
        );

        while !session.is_done() && session.rounds() < max_rounds {
            if session.rounds() > 0 {
                self.pacer.pause(self.params.interval).await;
            }

            let round = session.begin_round();
            debug!("Round {}: polling {} job(s)", session.rounds(), round.len());
            progress.on_round_start(session.rounds(), round.len());

            let observations: Vec<(K, PollObservation)> = stream::iter(round)
                .map(|(key, handle)| async move {
                    let observation = self.observe(credential, &handle).await;
                    (key, observation)
                })
                .buffer_unordered(self.params.max_concurrent_polls.max(1))
                .collect()
                .await;

            for (key, observation) in observations {
                if let Some(Transition::Resolved(status)) = session.observe(&key, observation) {
                    info!("Job {} resolved ({:?}) in round {}", key, status, session.rounds());
                    progress.on_job_resolved(&key.to_string(), status);
                }
            }
        }

        let report = session.finish();
        for (key, outcome) in &report.outcomes {
            if let Err(e) = outcome
                && e.kind == JobErrorKind::Timeout
            {
                warn!("Job {} timed out after {} round(s)", key, report.rounds);
                progress.on_job_resolved(&key.to_string(), JobStatus::Error);
            }
        }
        report
    }

    async fn observe(&self, credential: &Credential, handle: &JobHandle) -> PollObservation {
        match self.service.poll(credential, handle).await {
            Ok(response) => {
                let parsed = ParsedResponse::classify(&response.body);
                debug!(
                    "Poll {} -> HTTP {} ({})",
                    handle,
                    response.status,
                    parsed.label()
                );
                if let ParsedResponse::Malformed { detail } = &parsed {
                    warn!("Malformed poll response for {}: {}", handle, detail);
                }
                PollObservation::Response(parsed)
            }
            Err(e) => {
                warn!("Poll {} failed: {}", handle, e);
                PollObservation::TransportFailure(e.to_string())
            }
        }
    }
}
