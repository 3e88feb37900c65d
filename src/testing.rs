//! Testing utilities and helpers for actionpack
//!
//! This module provides ergonomic utilities for testing code built on actions: a
//! controllable clock, a scripted action that replays a fixed sequence of results,
//! assertion macros for outcomes, and property-based testing support.
//!
//! # Examples
//!
//! ## Scripted actions
//!
//! ```rust
//! use actionpack::prelude::*;
//! use actionpack::testing::Scripted;
//!
//! // Fails twice, then succeeds forever
//! let flaky = Scripted::failing(2, "timeout", 42);
//! assert!(!flaky.perform().successful());
//! assert!(!flaky.perform().successful());
//! assert_eq!(flaky.perform().into_result(), Ok(42));
//! assert_eq!(flaky.calls(), 3);
//! ```
//!
//! ## Assertion Macros
//!
//! ```rust
//! use actionpack::prelude::*;
//! use actionpack::testing::Scripted;
//! use actionpack::{assert_failure, assert_success};
//!
//! assert_success!(Scripted::<_, ()>::always(Ok(1)).perform());
//! assert_failure!(Scripted::<(), _>::always(Err("no")).perform());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::action::Action;
use crate::clock::{Clock, Timestamp};

/// A clock that only moves when told to.
///
/// Optionally ticks forward by a fixed step after every reading, so successive
/// outcomes get strictly increasing timestamps.
///
/// # Example
///
/// ```rust
/// use actionpack::clock::{Clock, Timestamp};
/// use actionpack::testing::ManualClock;
/// use std::time::Duration;
///
/// let clock = ManualClock::new(Timestamp::from_micros(1_000));
/// assert_eq!(clock.now().as_micros(), 1_000);
///
/// clock.advance(Duration::from_millis(2));
/// assert_eq!(clock.now().as_micros(), 3_000);
///
/// let ticking = ManualClock::new(Timestamp::from_micros(0)).with_tick(Duration::from_micros(5));
/// assert_eq!(ticking.now().as_micros(), 0);
/// assert_eq!(ticking.now().as_micros(), 5);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: AtomicI64,
    tick: i64,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            micros: AtomicI64::new(start.as_micros()),
            tick: 0,
        }
    }

    /// Move forward by `step` after every reading.
    pub fn with_tick(mut self, step: Duration) -> Self {
        self.tick = duration_micros(step);
        self
    }

    /// Jump to an absolute time.
    pub fn set(&self, at: Timestamp) {
        self.micros.store(at.as_micros(), Ordering::SeqCst);
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.micros.fetch_add(duration_micros(by), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.micros.fetch_add(self.tick, Ordering::SeqCst))
    }
}

fn duration_micros(d: Duration) -> i64 {
    i64::try_from(d.as_micros()).unwrap_or(i64::MAX)
}

/// An action that replays a fixed script of results.
///
/// The `n`th invocation returns the `n`th step; once the script runs out, the last
/// step repeats. Every invocation is counted, and an optional delay simulates slow
/// work.
pub struct Scripted<T, E> {
    steps: Vec<Result<T, E>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl<T: Clone, E: Clone> Scripted<T, E> {
    /// A script starting with `first`, followed by `rest`.
    pub fn new(first: Result<T, E>, rest: impl IntoIterator<Item = Result<T, E>>) -> Self {
        let mut steps = vec![first];
        steps.extend(rest);
        Self {
            steps,
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Always return `result`.
    pub fn always(result: Result<T, E>) -> Self {
        Self::new(result, [])
    }

    /// Fail `times` times with `error`, then succeed with `value` forever.
    pub fn failing(times: usize, error: E, value: T) -> Self {
        let mut steps: Vec<Result<T, E>> = (0..times).map(|_| Err(error.clone())).collect();
        steps.push(Ok(value));
        Self {
            steps,
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Sleep for `delay` inside every invocation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T: Clone, E: Clone> Action for Scripted<T, E> {
    type Output = T;
    type Error = E;

    fn invoke(&self) -> Result<T, E> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let last = self.steps.len() - 1;
        self.steps[n.min(last)].clone()
    }

    fn kind(&self) -> &'static str {
        "Scripted"
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Scripted<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scripted")
            .field("steps", &self.steps)
            .field("calls", &self.calls.load(Ordering::SeqCst))
            .field("delay", &self.delay)
            .finish()
    }
}

/// Assert that an outcome is successful.
///
/// This macro will panic if the outcome holds a failure.
///
/// # Example
///
/// ```rust
/// use actionpack::prelude::*;
/// use actionpack::{assert_success, testing::Scripted};
///
/// assert_success!(Scripted::<_, String>::always(Ok(42)).perform());
/// ```
#[macro_export]
macro_rules! assert_success {
    ($outcome:expr) => {
        match $outcome.as_result() {
            Ok(_) => {}
            Err(e) => {
                panic!("Expected success, got failure: {:?}", e);
            }
        }
    };
}

/// Assert that an outcome is a failure.
///
/// This macro will panic if the outcome holds a value.
///
/// # Example
///
/// ```rust
/// use actionpack::prelude::*;
/// use actionpack::{assert_failure, testing::Scripted};
///
/// assert_failure!(Scripted::<i32, _>::always(Err("boom")).perform());
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($outcome:expr) => {
        match $outcome.as_result() {
            Err(_) => {}
            Ok(v) => {
                panic!("Expected failure, got success: {:?}", v);
            }
        }
    };
}

/// Assert that an outcome failed with an error matching a pattern.
///
/// # Example
///
/// ```rust
/// use actionpack::prelude::*;
/// use actionpack::{assert_failure_matches, testing::Scripted, RetryError};
///
/// let policy = Scripted::<i32, _>::always(Err("down")).retry(0);
/// assert_failure_matches!(policy.perform(), RetryError::Expired(_));
/// ```
#[macro_export]
macro_rules! assert_failure_matches {
    ($outcome:expr, $pattern:pat) => {
        match $outcome.as_result() {
            Err(e) => {
                if !matches!(e, $pattern) {
                    panic!(
                        "Expected failure matching {}, got: {:?}",
                        stringify!($pattern),
                        e
                    );
                }
            }
            Ok(v) => {
                panic!(
                    "Expected failure matching {}, got success: {:?}",
                    stringify!($pattern),
                    v
                );
            }
        }
    };
}

#[cfg(feature = "proptest")]
use crate::retry::{Backoff, RetryConfig};
#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for Backoff {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Backoff::Constant),
            Just(Backoff::Linear),
            Just(Backoff::Exponential),
        ]
        .boxed()
    }
}

#[cfg(feature = "proptest")]
impl Arbitrary for RetryConfig {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            0u32..8,
            0u64..5_000,
            any::<Backoff>(),
            0u8..=100,
        )
            .prop_map(|(max_retries, delay_ms, backoff, jitter)| {
                RetryConfig::new(max_retries)
                    .with_delay(Duration::from_millis(delay_ms))
                    .with_backoff(backoff)
                    .with_jitter_percentage(jitter)
            })
            .boxed()
    }
}
