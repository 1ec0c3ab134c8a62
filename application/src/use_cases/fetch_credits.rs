//! Fetch Credits use case
//!
//! Asks the service for the account's remaining credit balance without
//! submitting any work.

use crate::config::ClientConfig;
use crate::ports::analysis_service::AnalysisService;
use captionkit_domain::{JobError, JobErrorKind, parse_account_credits};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct FetchCreditsUseCase<S: AnalysisService + 'static> {
    service: Arc<S>,
    config: ClientConfig,
}

impl<S: AnalysisService + 'static> FetchCreditsUseCase<S> {
    pub fn new(service: Arc<S>, config: ClientConfig) -> Self {
        Self { service, config }
    }

    pub async fn execute(&self) -> Result<i64, JobError> {
        let credential = self
            .config
            .credential
            .as_ref()
            .ok_or_else(JobError::no_credential)?;

        let response = self.service.account(credential).await.map_err(|e| {
            warn!("Account lookup failed: {}", e);
            JobError::transport(e.to_string())
        })?;

        if !response.is_success() {
            return match parse_account_credits(&response.body) {
                Err(e) if e.kind == JobErrorKind::ServiceReportedError => Err(e),
                _ => Err(JobError::new(
                    JobErrorKind::HttpStatus,
                    format!("service returned HTTP {}", response.status),
                )),
            };
        }

        let credits = parse_account_credits(&response.body)?;
        debug!("Account has {} credit(s) left", credits);
        Ok(credits)
    }
}
