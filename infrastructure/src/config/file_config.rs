//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application config
//! types once merged.

use captionkit_application::{ClientConfig, PollParams};
use captionkit_domain::{DEFAULT_MALFORMED_LIMIT, Role};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("service.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("service.endpoint cannot be empty")]
    EmptyEndpoint,

    #[error("polling.interval_ms cannot be 0")]
    InvalidInterval,

    #[error("polling.max_rounds cannot be 0")]
    InvalidMaxRounds,
}

/// Raw remote service configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServiceConfig {
    /// Base URL of the analysis service
    pub endpoint: String,
    /// Access credential (prefer `CAPTIONKIT_SERVICE__API_KEY` over storing it in a file)
    pub api_key: Option<String>,
    /// Timeout in seconds for a single HTTP call
    pub timeout_seconds: u64,
    /// Backend model requested when a request names none
    pub default_backend: Option<String>,
    /// Resource size cap in MiB
    pub max_resource_mb: u64,
}

impl Default for FileServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.captionkit.dev/v1".to_string(),
            api_key: None,
            timeout_seconds: 30,
            default_backend: None,
            max_resource_mb: 16,
        }
    }
}

/// Raw analysis defaults from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnalysisConfig {
    /// Language of the generated text
    pub language: String,
    /// Roles requested per resource when the command line names none
    pub roles: Vec<Role>,
    /// Display length for generated text (0 disables truncation)
    pub max_length: usize,
}

impl Default for FileAnalysisConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            roles: vec![Role::AltText],
            max_length: 125,
        }
    }
}

/// Raw polling configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePollingConfig {
    /// Default round budget per batch
    pub max_rounds: u32,
    /// Pause between rounds in milliseconds
    pub interval_ms: u64,
    /// Consecutive undecodable responses tolerated per job
    pub malformed_limit: u32,
}

impl Default for FilePollingConfig {
    fn default() -> Self {
        Self {
            max_rounds: 30,
            interval_ms: 2000,
            malformed_limit: DEFAULT_MALFORMED_LIMIT,
        }
    }
}

/// Raw result log configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// JSONL file receiving one line per job event (disabled when unset)
    pub results_path: Option<PathBuf>,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Remote service settings
    pub service: FileServiceConfig,
    /// Analysis defaults
    pub analysis: FileAnalysisConfig,
    /// Polling settings
    pub polling: FilePollingConfig,
    /// Result log settings
    pub log: FileLogConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.service.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.service.endpoint.trim().is_empty() {
            return Err(ConfigValidationError::EmptyEndpoint);
        }
        if self.polling.interval_ms == 0 {
            return Err(ConfigValidationError::InvalidInterval);
        }
        if self.polling.max_rounds == 0 {
            return Err(ConfigValidationError::InvalidMaxRounds);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_seconds)
    }

    /// Build the client configuration (credential, backend, size cap)
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default()
            .with_default_backend(self.service.default_backend.clone())
            .with_max_resource_bytes(self.service.max_resource_mb.saturating_mul(1024 * 1024));
        if let Some(key) = &self.service.api_key {
            config = config.with_credential(key.clone());
        }
        config
    }

    pub fn poll_params(&self) -> PollParams {
        PollParams::default()
            .with_max_rounds(self.polling.max_rounds)
            .with_interval(Duration::from_millis(self.polling.interval_ms))
            .with_malformed_limit(self.polling.malformed_limit)
    }
}
