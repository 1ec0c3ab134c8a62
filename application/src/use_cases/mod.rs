//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod analyze_resource;
pub mod fetch_credits;
pub mod poll_jobs;
pub mod submit_job;
