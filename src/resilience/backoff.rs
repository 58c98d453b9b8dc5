//! Exponential backoff with jitter for the update poll loop.
//!
//! Only the chat transport backs off; reload and mutation failures are
//! reported to the user and never retried.

use std::time::Duration;

use rand::Rng;

/// Calculate exponential backoff delay with up to 10% jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exponential = 2u64.saturating_pow(attempt - 1);
    let capped = base_ms.saturating_mul(exponential).min(max_ms);

    let jitter_range = capped / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped + jitter)
}

/// Tracks consecutive poll failures.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    failures: u32,
    base_ms: u64,
    max_ms: u64,
}

impl PollBackoff {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self {
            failures: 0,
            base_ms,
            max_ms,
        }
    }

    /// Register a failure and return how long to wait before polling again.
    pub fn next_delay(&mut self) -> Duration {
        self.failures = self.failures.saturating_add(1);
        calculate_backoff(self.failures, self.base_ms, self.max_ms)
    }

    pub fn reset(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl Default for PollBackoff {
    fn default() -> Self {
        Self::new(500, 30_000)
    }
}
