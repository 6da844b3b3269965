//! Retry policy for transient upstream failures
//!
//! The upstream throttles aggressively; a 429 or 5xx is almost always
//! transient. Retries use exponential backoff with optional jitter and a
//! hard attempt ceiling so one bad URL cannot stall a worker forever.

use rand::Rng;
use std::time::Duration;

/// Retry configuration for the resilient fetcher
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum retry attempts after the initial request
    pub max_attempts: u32,

    /// Base delay after a retryable HTTP status (429, 5xx, ...)
    pub status_backoff: Duration,

    /// Base delay after a transport failure (timeout, reset, DNS)
    pub transport_backoff: Duration,

    /// Multiplier applied to the base delay per prior attempt
    pub backoff_multiplier: f64,

    /// Upper bound on any single delay
    pub max_delay: Duration,

    /// Whether to add random jitter (delay..2*delay)
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            status_backoff: Duration::from_secs(5),
            transport_backoff: Duration::from_secs(20),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(120),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Computes the delay before the given retry attempt (1-based)
    ///
    /// The base delay is scaled by `backoff_multiplier` once per prior
    /// attempt and capped at `max_delay`; jitter is applied last.
    pub fn delay_for(&self, base: Duration, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let scaled = base.as_secs_f64() * self.backoff_multiplier.powi(exponent as i32);
        let capped = Duration::from_secs_f64(scaled.min(self.max_delay.as_secs_f64()));
        if self.jitter {
            add_jitter(capped)
        } else {
            capped
        }
    }
}

/// Adds uniform random jitter between 0% and 100% of the delay
fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    Duration::from_secs_f64(delay.as_secs_f64() * (1.0 + jitter_factor))
}
