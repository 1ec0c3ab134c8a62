//! Infrastructure layer for captionkit
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer.
//!
//! - [`http`]: reqwest client for the remote analysis service
//! - [`fs`]: local filesystem resource source
//! - [`config`]: figment configuration loading
//! - [`logging`]: JSONL result log

pub mod config;
pub mod fs;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use fs::FsResourceSource;
pub use http::{HttpAnalysisService, HttpClientError};
pub use logging::JsonlResultLogger;
