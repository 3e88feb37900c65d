//! Retry and resilience for actions.
//!
//! A [`RetryPolicy`] wraps any [`Action`](crate::Action) and is an action itself:
//! performing it performs the inner action until it succeeds or the retry budget is
//! spent, sleeping between failures.
//!
//! - **Configuration is data**: [`RetryConfig`] describes retries, delays, backoff
//!   and jitter, and can be compared, cloned and (with the `serde` feature)
//!   persisted.
//! - **Single use**: a policy is enacted once; performing it again fails with
//!   [`RetryError::Enacted`] or [`RetryError::Expired`].
//! - **Observable**: every failed attempt is logged at `warn` with its delay, and
//!   attempts can optionally be recorded.
//!
//! # Quick Start
//!
//! ```rust
//! use actionpack::prelude::*;
//! use actionpack::testing::Scripted;
//! use actionpack::RetryConfig;
//! use std::time::Duration;
//!
//! let config = RetryConfig::new(3)
//!     .with_delay(Duration::from_millis(1))
//!     .with_backoff(Backoff::Exponential);
//!
//! let policy = RetryPolicy::with_config(Scripted::failing(1, "flaky", "ok"), config).unwrap();
//! assert_eq!(policy.perform().into_result(), Ok("ok"));
//! assert_eq!(policy.retries(), Some(1));
//! ```
//!
//! # Backoff Strategies
//!
//! - **Constant**: Fixed delay between retries (2s, 2s, 2s, ...)
//! - **Linear**: Delay grows by the base (2s, 4s, 6s, ...)
//! - **Exponential**: Delay is multiplied by the base (2s, 4s, 8s, ...)
//!
//! # Jitter
//!
//! Every delay is offset by a uniformly random amount of up to
//! `jitter_percentage` percent of the base delay (1% by default), to keep many
//! callers from retrying in lockstep. A zero base delay is never jittered.

mod backoff;
mod config;
mod error;
mod policy;

pub use backoff::Backoff;
pub use config::{RetryConfig, DEFAULT_JITTER_PERCENTAGE, DEFAULT_MAX_DELAY};
pub use error::{RetryError, RetryExhausted};
pub use policy::RetryPolicy;

#[cfg(test)]
mod tests;
