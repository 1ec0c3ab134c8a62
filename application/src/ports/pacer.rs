//! Pacer port
//!
//! The pause between two polling rounds, behind a trait so the loop can run
//! on the tokio timer in production and on a counter in tests.

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Pauses on the tokio timer without blocking the worker thread
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
