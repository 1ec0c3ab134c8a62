//! Configuration file loading for captionkit
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CAPTIONKIT_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./captionkit.toml` or `./.captionkit.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/captionkit/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAnalysisConfig, FileConfig, FileLogConfig, FilePollingConfig,
    FileServiceConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
