//! Polling: the state machine that drives async jobs to a terminal outcome.

pub mod session;
