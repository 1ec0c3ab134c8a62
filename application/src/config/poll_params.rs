//! Poll parameters — polling loop control.

use captionkit_domain::DEFAULT_MALFORMED_LIMIT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling loop control parameters.
///
/// `max_rounds` is the default budget; callers with a short execution window
/// pass a smaller override per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollParams {
    /// Rounds issued before pending jobs are declared timed out.
    pub max_rounds: u32,
    /// Pause between two rounds.
    pub interval: Duration,
    /// Consecutive malformed responses tolerated for one job.
    pub malformed_limit: u32,
    /// Poll calls in flight at once within a round.
    pub max_concurrent_polls: usize,
}

impl Default for PollParams {
    fn default() -> Self {
        Self {
            max_rounds: 30,
            interval: Duration::from_secs(2),
            malformed_limit: DEFAULT_MALFORMED_LIMIT,
            max_concurrent_polls: 8,
        }
    }
}

impl PollParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_malformed_limit(mut self, limit: u32) -> Self {
        self.malformed_limit = limit;
        self
    }

    pub fn with_max_concurrent_polls(mut self, max: usize) -> Self {
        self.max_concurrent_polls = max.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = PollParams::default();
        assert_eq!(params.max_rounds, 30);
        assert_eq!(params.interval, Duration::from_secs(2));
        assert_eq!(params.malformed_limit, 5);
        assert_eq!(params.max_concurrent_polls, 8);
    }

    #[test]
    fn test_builder() {
        let params = PollParams::default()
            .with_max_rounds(10)
            .with_interval(Duration::from_millis(500))
            .with_max_concurrent_polls(0);

        assert_eq!(params.max_rounds, 10);
        assert_eq!(params.interval, Duration::from_millis(500));
        assert_eq!(params.max_concurrent_polls, 1);
    }
}
