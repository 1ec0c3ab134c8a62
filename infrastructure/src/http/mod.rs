//! HTTP adapter for the remote analysis service.

mod service;
mod wire;

pub use service::{HttpAnalysisService, HttpClientError};
