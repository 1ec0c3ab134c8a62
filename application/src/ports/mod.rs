//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod analysis_service;
pub mod pacer;
pub mod progress;
pub mod resource_source;
pub mod result_logger;
