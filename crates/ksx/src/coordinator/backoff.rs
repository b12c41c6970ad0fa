//! ⏳ Backoff: how long to sulk between attempts.
//!
//! `delay(attempt) = min(base * 2^attempt + U[0, base], max_delay)`
//!
//! The jitter keeps two hundred virtual users who all failed on the same shard
//! from coming back at the exact same millisecond and failing together again.

use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

/// 🔧 Retry knobs, as they appear under `[engine.retry]`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, first one included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    5_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            // -- zero attempts would mean "never send", which is a strange way to send
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 🎲 Delay to wait after `attempt` (1-based) failed, before the next one.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let exponential_ms = 2u64
            .checked_pow(attempt)
            .and_then(|factor| base_ms.checked_mul(factor))
            .unwrap_or(u64::MAX);
        let jitter_ms = if base_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=base_ms)
        };
        Duration::from_millis(exponential_ms.saturating_add(jitter_ms)).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}
