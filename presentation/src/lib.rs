//! Presentation layer for captionkit
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::messages::user_message;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
