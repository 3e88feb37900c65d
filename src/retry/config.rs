//! Retry configuration: pure data describing how often and how patiently to retry.

use std::time::Duration;

use crate::error::ConstructionError;
use crate::retry::backoff::Backoff;

/// Percentage of the base delay added or removed at random, unless configured.
pub const DEFAULT_JITTER_PERCENTAGE: u8 = 1;

/// Upper bound on any single delay, unless configured.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(3600);

/// How a [`RetryPolicy`](crate::RetryPolicy) spaces out its attempts.
///
/// A configuration is just data - it describes retry behavior but doesn't execute
/// it, so it is easy to test, clone, compare and (with the `serde` feature)
/// persist.
///
/// `max_retries` counts retries, not attempts: `max_retries = 3` means up to four
/// attempts in total.
///
/// # Examples
///
/// ```rust
/// use actionpack::{Backoff, RetryConfig};
/// use std::time::Duration;
///
/// let config = RetryConfig::new(3)
///     .with_delay(Duration::from_secs(2))
///     .with_backoff(Backoff::Linear)
///     .with_jitter_percentage(0);
///
/// assert_eq!(config.delay_for_attempt(0), Some(Duration::from_secs(2)));
/// assert_eq!(config.delay_for_attempt(1), Some(Duration::from_secs(4)));
/// assert_eq!(config.delay_for_attempt(2), Some(Duration::from_secs(6)));
/// assert_eq!(config.delay_for_attempt(3), None); // that was the last attempt
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryConfig {
    max_retries: u32,
    delay_between_attempts: Duration,
    max_delay: Duration,
    backoff: Backoff,
    jitter_percentage: u8,
}

impl RetryConfig {
    /// Retry up to `max_retries` times, back to back.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            delay_between_attempts: Duration::ZERO,
            max_delay: DEFAULT_MAX_DELAY,
            backoff: Backoff::Constant,
            jitter_percentage: DEFAULT_JITTER_PERCENTAGE,
        }
    }

    /// Set the base delay the backoff strategy grows from.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_between_attempts = delay;
        self
    }

    /// Cap every delay at `max_delay`, whatever the strategy computes.
    ///
    /// ```rust
    /// use actionpack::{Backoff, RetryConfig};
    /// use std::time::Duration;
    ///
    /// let config = RetryConfig::new(10)
    ///     .with_delay(Duration::from_secs(2))
    ///     .with_backoff(Backoff::Exponential)
    ///     .with_jitter_percentage(0)
    ///     .with_max_delay(Duration::from_secs(5));
    ///
    /// // Without cap: 2s, 4s, 8s, 16s...
    /// assert_eq!(config.delay_for_attempt(1), Some(Duration::from_secs(4)));
    /// assert_eq!(config.delay_for_attempt(2), Some(Duration::from_secs(5)));
    /// ```
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set the backoff strategy.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the jitter, as a whole percentage of the base delay.
    ///
    /// Values above 100 are rejected by [`validate`](RetryConfig::validate) and
    /// therefore by every policy constructor that takes a configuration.
    pub fn with_jitter_percentage(mut self, percentage: u8) -> Self {
        self.jitter_percentage = percentage;
        self
    }

    /// Maximum number of retries after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Base delay.
    pub fn delay_between_attempts(&self) -> Duration {
        self.delay_between_attempts
    }

    /// Delay cap.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Backoff strategy.
    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Jitter percentage.
    pub fn jitter_percentage(&self) -> u8 {
        self.jitter_percentage
    }

    /// Check the configuration can be enacted.
    pub fn validate(&self) -> Result<(), ConstructionError> {
        if self.jitter_percentage > 100 {
            return Err(ConstructionError::JitterOutOfRange(self.jitter_percentage));
        }
        Ok(())
    }

    /// Delay to wait after attempt `attempt` (0-indexed) fails.
    ///
    /// Returns `None` when `attempt` was the last one allowed: there is nothing to
    /// wait for.
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }
        Some(self.backoff.delay(
            attempt,
            self.delay_between_attempts,
            self.jitter_percentage,
            self.max_delay,
        ))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
