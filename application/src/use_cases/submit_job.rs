//! Submit Job use case
//!
//! Validates, encodes and sends one analysis request, and classifies the
//! service's answer into an immediate result, a pending handle or an error.

use crate::config::ClientConfig;
use crate::encoding::EncoderCache;
use crate::ports::analysis_service::{AnalysisService, RawResponse, SubmitPayload};
use crate::ports::resource_source::ResourceSource;
use captionkit_domain::{
    AnalysisRequest, JobError, JobErrorKind, ParsedResponse, SubmitOutcome, resolve_completed,
    validate_resource,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for submitting a single analysis job
pub struct SubmitJobUseCase<S: AnalysisService + 'static, R: ResourceSource + 'static> {
    service: Arc<S>,
    source: Arc<R>,
    encoder: Arc<EncoderCache<R>>,
    config: ClientConfig,
}

impl<S: AnalysisService + 'static, R: ResourceSource + 'static> SubmitJobUseCase<S, R> {
    pub fn new(
        service: Arc<S>,
        source: Arc<R>,
        encoder: Arc<EncoderCache<R>>,
        config: ClientConfig,
    ) -> Self {
        Self {
            service,
            source,
            encoder,
            config,
        }
    }

    /// Submit one request. Never polls.
    pub async fn execute(&self, request: &AnalysisRequest) -> SubmitOutcome {
        let Some(credential) = &self.config.credential else {
            return SubmitOutcome::Error(JobError::no_credential());
        };

        let path = request.resource();
        let size = match self.source.size(path) {
            Ok(size) => size,
            Err(e) => {
                return SubmitOutcome::Error(JobError::new(
                    JobErrorKind::ResourceUnreadable,
                    format!("{}: {}", path.display(), e),
                ));
            }
        };
        if let Err(e) = validate_resource(path, size, self.config.max_resource_bytes) {
            return SubmitOutcome::Error(e);
        }

        let image = match self.encoder.encode(path) {
            Ok(image) => image,
            Err(e) => return SubmitOutcome::Error(e),
        };

        let payload =
            SubmitPayload::from_request(request, image, self.config.default_backend.as_deref());
        debug!(
            "Submitting {} ({:?}, language={}, backends={:?})",
            path.display(),
            payload.instruction,
            payload.language,
            payload.backends
        );

        match self.service.submit(credential, &payload).await {
            Ok(response) => classify_submit_response(&response),
            Err(e) => {
                warn!("Submit for {} failed: {}", path.display(), e);
                SubmitOutcome::Error(JobError::transport(e.to_string()))
            }
        }
    }
}

/// Interpret the service's answer to a submit call.
///
/// A non-2xx status with a service `error` message is reported as that
/// message; any other non-2xx status is an `HttpStatus` error.
pub fn classify_submit_response(response: &RawResponse) -> SubmitOutcome {
    let parsed = ParsedResponse::classify(&response.body);

    if !response.is_success() {
        let error = match parsed {
            ParsedResponse::ServiceError { message, credits } => {
                JobError::service(message).with_credits(credits)
            }
            other => JobError::new(
                JobErrorKind::HttpStatus,
                format!("service returned HTTP {}", response.status),
            )
            .with_credits(other.credits()),
        };
        warn!("Submit rejected: {}", error);
        return SubmitOutcome::Error(error);
    }

    match parsed {
        ParsedResponse::Completed(payload) => {
            info!("Submit returned results immediately");
            resolve_completed(&payload).into()
        }
        ParsedResponse::InProgress {
            handle: Some(handle),
            ..
        } => {
            debug!("Job accepted, polling {}", handle);
            SubmitOutcome::Pending(handle)
        }
        ParsedResponse::InProgress { handle: None, .. } => SubmitOutcome::Error(JobError::new(
            JobErrorKind::UnexpectedResponseShape,
            "job accepted without a completion handle",
        )),
        ParsedResponse::ServiceError { message, credits } => {
            SubmitOutcome::Error(JobError::service(message).with_credits(credits))
        }
        ParsedResponse::Malformed { detail } => {
            SubmitOutcome::Error(JobError::new(JobErrorKind::MalformedResponse, detail))
        }
        ParsedResponse::Unrecognized { detail, credits } => SubmitOutcome::Error(
            JobError::new(JobErrorKind::UnexpectedResponseShape, detail).with_credits(credits),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemorySource, Reply, ScriptedService};
    use captionkit_domain::{JobHandle, Role};

    fn use_case(
        service: Arc<ScriptedService>,
        source: MemorySource,
        config: ClientConfig,
    ) -> SubmitJobUseCase<ScriptedService, MemorySource> {
        let source = Arc::new(source);
        let encoder = Arc::new(EncoderCache::new(Arc::clone(&source)));
        SubmitJobUseCase::new(service, source, encoder, config)
    }

    fn config() -> ClientConfig {
        ClientConfig::default().with_credential("key")
    }

    fn photo() -> MemorySource {
        MemorySource::new().with_file("photo.jpg", b"\xff\xd8\xff")
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_any_call() {
        let service = Arc::new(ScriptedService::new());
        let submit = use_case(Arc::clone(&service), photo(), ClientConfig::default());

        let outcome = submit
            .execute(&AnalysisRequest::new("photo.jpg", Role::AltText))
            .await;

        let SubmitOutcome::Error(err) = outcome else {
            panic!("expected error");
        };
        assert_eq!(err.kind, JobErrorKind::NoCredential);
        assert_eq!(service.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_resource_validation_errors() {
        let service = Arc::new(ScriptedService::new());
        let source = photo()
            .with_file("notes.txt", b"hello")
            .with_file("huge.png", &[0u8; 64]);
        let submit = use_case(
            Arc::clone(&service),
            source,
            config().with_max_resource_bytes(32),
        );

        for (path, kind) in [
            ("missing.jpg", JobErrorKind::NotFound),
            ("notes.txt", JobErrorKind::UnsupportedFormat),
            ("huge.png", JobErrorKind::TooLarge),
        ] {
            let outcome = submit.execute(&AnalysisRequest::new(path, Role::AltText)).await;
            let SubmitOutcome::Error(err) = outcome else {
                panic!("expected error for {path}");
            };
            assert_eq!(err.kind, kind, "{path}");
        }
        assert_eq!(service.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_pending_handle() {
        let service = Arc::new(ScriptedService::new());
        service.on_submit(
            "alt_text",
            Reply::ok(r#"{"completion_url": "https://svc/jobs/1", "status": "queued"}"#),
        );
        let submit = use_case(Arc::clone(&service), photo(), config());

        let outcome = submit
            .execute(&AnalysisRequest::new("photo.jpg", Role::AltText))
            .await;
        assert_eq!(
            outcome,
            SubmitOutcome::Pending(JobHandle::new("https://svc/jobs/1"))
        );
    }

    #[tokio::test]
    async fn test_immediate_result() {
        let service = Arc::new(ScriptedService::new());
        service.on_submit(
            "caption",
            Reply::ok(r#"{"results": [{"text": "A lighthouse at dusk", "source": "v3"}], "credits": 17}"#),
        );
        let submit = use_case(Arc::clone(&service), photo(), config());

        let outcome = submit
            .execute(&AnalysisRequest::new("photo.jpg", Role::Caption))
            .await;
        let SubmitOutcome::Immediate(result) = outcome else {
            panic!("expected immediate result");
        };
        assert_eq!(result.generated_text, "A lighthouse at dusk");
        assert_eq!(result.remaining_credits, Some(17));
    }

    #[tokio::test]
    async fn test_access_denied_is_service_error_not_transport() {
        let service = Arc::new(ScriptedService::new());
        service.on_submit("alt_text", Reply::status(403, r#"{"error": "Access denied."}"#));
        let submit = use_case(Arc::clone(&service), photo(), config());

        let outcome = submit
            .execute(&AnalysisRequest::new("photo.jpg", Role::AltText))
            .await;
        let SubmitOutcome::Error(err) = outcome else {
            panic!("expected error");
        };
        assert_eq!(err.kind, JobErrorKind::ServiceReportedError);
        assert_eq!(err.detail, "Access denied.");
        assert_eq!(service.poll_calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_on_submit() {
        let service = Arc::new(ScriptedService::new());
        service.on_submit("alt_text", Reply::transport("connection refused"));
        let submit = use_case(Arc::clone(&service), photo(), config());

        let outcome = submit
            .execute(&AnalysisRequest::new("photo.jpg", Role::AltText))
            .await;
        let SubmitOutcome::Error(err) = outcome else {
            panic!("expected error");
        };
        assert_eq!(err.kind, JobErrorKind::TransportFailure);
        assert!(err.detail.contains("connection refused"));
    }

    #[test]
    fn test_classify_non_success_without_error_field() {
        let outcome = classify_submit_response(&RawResponse::new(502, "<html>Bad Gateway</html>"));
        let SubmitOutcome::Error(err) = outcome else {
            panic!("expected error");
        };
        assert_eq!(err.kind, JobErrorKind::HttpStatus);
        assert!(err.detail.contains("502"));
    }

    #[test]
    fn test_classify_non_success_keeps_body_credits() {
        let outcome = classify_submit_response(&RawResponse::new(
            402,
            r#"{"credits": 0, "detail": "payment required"}"#,
        ));
        let SubmitOutcome::Error(err) = outcome else {
            panic!("expected error");
        };
        assert_eq!(err.kind, JobErrorKind::HttpStatus);
        assert_eq!(err.detail, "service returned HTTP 402");
        assert_eq!(err.credits, Some(0));
    }

    #[test]
    fn test_classify_unknown_status_keeps_credits() {
        let outcome =
            classify_submit_response(&RawResponse::ok(r#"{"status": "failed", "credits": 7}"#));
        let SubmitOutcome::Error(err) = outcome else {
            panic!("expected error");
        };
        assert_eq!(err.kind, JobErrorKind::UnexpectedResponseShape);
        assert_eq!(err.credits, Some(7));
    }

    #[test]
    fn test_classify_undecodable_success_body() {
        let outcome = classify_submit_response(&RawResponse::ok("not json"));
        let SubmitOutcome::Error(err) = outcome else {
            panic!("expected error");
        };
        assert_eq!(err.kind, JobErrorKind::MalformedResponse);
    }

    #[test]
    fn test_classify_accepted_without_handle() {
        let outcome = classify_submit_response(&RawResponse::ok(r#"{"status": "queued"}"#));
        let SubmitOutcome::Error(err) = outcome else {
            panic!("expected error");
        };
        assert_eq!(err.kind, JobErrorKind::UnexpectedResponseShape);
    }
}
