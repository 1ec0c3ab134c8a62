//! Application layer for captionkit
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod encoding;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{ClientConfig, Credential, PollParams};
pub use encoding::{EncodedPayload, EncoderCache};
pub use ports::{
    analysis_service::{AnalysisService, RawResponse, SubmitInstruction, SubmitPayload, TransportError},
    pacer::{Pacer, TokioPacer},
    progress::{NoProgress, PollProgressNotifier},
    resource_source::ResourceSource,
    result_logger::{JobEvent, NoResultLogger, ResultLogger},
};
pub use use_cases::analyze_resource::{AnalyzeInput, AnalyzeResourceUseCase, BatchOutcome};
pub use use_cases::fetch_credits::FetchCreditsUseCase;
pub use use_cases::poll_jobs::PollJobsUseCase;
pub use use_cases::submit_job::{SubmitJobUseCase, classify_submit_response};
