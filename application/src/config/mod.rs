//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ClientConfig`] — credential, default backend and resource cap
//! - [`PollParams`] — polling loop control (rounds, interval, malformed tolerance)

pub mod client_config;
pub mod poll_params;

pub use client_config::{ClientConfig, Credential};
pub use poll_params::PollParams;
