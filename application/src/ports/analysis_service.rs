//! Analysis service port
//!
//! Defines the interface for talking to the remote image-analysis service.

use crate::config::Credential;
use crate::encoding::EncodedPayload;
use async_trait::async_trait;
use captionkit_domain::{AnalysisRequest, Instruction, JobHandle};
use std::sync::Arc;
use thiserror::Error;

/// Network-level failures: the call never produced a response body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    Other(String),
}

/// Status code and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Role or prompt, owned, as it goes on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitInstruction {
    Role(String),
    Prompt(String),
}

/// Everything one submit call sends
#[derive(Debug, Clone)]
pub struct SubmitPayload {
    pub image: Arc<EncodedPayload>,
    pub instruction: SubmitInstruction,
    pub language: String,
    /// Empty when neither the request nor the client names a backend
    pub backends: Vec<String>,
    pub features: Vec<&'static str>,
}

impl SubmitPayload {
    /// Assemble the payload for a request; the request's backend wins over `default_backend`.
    pub fn from_request(
        request: &AnalysisRequest,
        image: Arc<EncodedPayload>,
        default_backend: Option<&str>,
    ) -> Self {
        let instruction = match request.instruction() {
            Instruction::Role(role) => SubmitInstruction::Role(role.as_str().to_string()),
            Instruction::Prompt(prompt) => SubmitInstruction::Prompt(prompt.to_string()),
        };
        let backends = request
            .backend()
            .or(default_backend)
            .map(|b| vec![b.to_string()])
            .unwrap_or_default();

        Self {
            image,
            instruction,
            language: request.language().to_string(),
            backends,
            features: request.features().names(),
        }
    }
}

/// Gateway to the remote analysis service
///
/// Implementations return the raw exchange; classification of the body is
/// done by the caller, once, through `ParsedResponse::classify`.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Submit one analysis job
    async fn submit(
        &self,
        credential: &Credential,
        payload: &SubmitPayload,
    ) -> Result<RawResponse, TransportError>;

    /// Poll a job by its completion handle
    async fn poll(
        &self,
        credential: &Credential,
        handle: &JobHandle,
    ) -> Result<RawResponse, TransportError>;

    /// Query the account's credit balance
    async fn account(&self, credential: &Credential) -> Result<RawResponse, TransportError>;
}
