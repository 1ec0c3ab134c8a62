//! Logging infrastructure — structured result logging.
//!
//! Provides [`JsonlResultLogger`], a JSONL file writer that implements
//! the [`ResultLogger`](captionkit_application::ResultLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlResultLogger;
