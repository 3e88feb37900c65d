//! The retry policy action.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};

use crate::action::Action;
use crate::clock::{Clock, SystemClock};
use crate::error::ConstructionError;
use crate::outcome::Outcome;
use crate::retry::config::RetryConfig;
use crate::retry::error::{RetryError, RetryExhausted};

type Recorder<T, E> = fn(&Outcome<T, E>) -> Outcome<T, E>;

struct State {
    claimed: bool,
    retries: Option<u32>,
}

/// Perform an action until it succeeds or the retry budget runs out.
///
/// A policy wraps another action and is itself an action: performing it performs
/// the inner action up to `max_retries + 1` times, sleeping between failures as
/// the [`RetryConfig`] dictates. The first success is returned immediately.
///
/// A policy is enacted at most once. Performing it again yields
/// [`RetryError::Expired`] when the budget was spent, or
/// [`RetryError::Enacted`] otherwise.
///
/// # Examples
///
/// ```rust
/// use actionpack::prelude::*;
/// use actionpack::testing::Scripted;
///
/// // Fails twice, then succeeds
/// let policy = Scripted::failing(2, "timeout", 42).retry(3);
///
/// assert_eq!(policy.perform().into_result(), Ok(42));
/// assert_eq!(policy.retries(), Some(2));
/// assert!(policy.enacted());
/// assert!(!policy.expired());
///
/// // Never runs twice
/// assert!(policy.perform().error().is_some_and(RetryError::is_enacted));
/// ```
pub struct RetryPolicy<A: Action> {
    action: A,
    config: RetryConfig,
    name: Option<String>,
    clock: Arc<dyn Clock>,
    recorder: Option<Recorder<A::Output, A::Error>>,
    state: Mutex<State>,
    log: Mutex<Vec<Outcome<A::Output, A::Error>>>,
}

impl<A: Action> RetryPolicy<A> {
    /// Retry `action` up to `max_retries` times with the default configuration.
    pub fn new(action: A, max_retries: u32) -> Self {
        Self::assemble(action, RetryConfig::new(max_retries))
    }

    /// Retry `action` as `config` describes.
    ///
    /// ```rust
    /// use actionpack::prelude::*;
    /// use actionpack::testing::Scripted;
    /// use actionpack::{ConstructionError, RetryConfig};
    ///
    /// let config = RetryConfig::new(2).with_jitter_percentage(101);
    /// let err = RetryPolicy::with_config(Scripted::<(), ()>::always(Ok(())), config).unwrap_err();
    /// assert_eq!(err, ConstructionError::JitterOutOfRange(101));
    /// ```
    pub fn with_config(action: A, config: RetryConfig) -> Result<Self, ConstructionError> {
        config.validate()?;
        Ok(Self::assemble(action, config))
    }

    fn assemble(action: A, config: RetryConfig) -> Self {
        Self {
            action,
            config,
            name: None,
            clock: Arc::new(SystemClock),
            recorder: None,
            state: Mutex::new(State {
                claimed: false,
                retries: None,
            }),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Name the policy. Without one, the inner action's name is used.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Timestamp recorded outcomes with `clock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The wrapped action.
    pub fn action(&self) -> &A {
        &self.action
    }

    /// The retry configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Whether every attempt's outcome is kept in [`attempts`](RetryPolicy::attempts).
    pub fn should_record(&self) -> bool {
        self.recorder.is_some()
    }

    /// Retries spent so far; `None` until the first attempt completes.
    pub fn retries(&self) -> Option<u32> {
        self.state.lock().retries
    }

    /// Whether any attempt has completed.
    pub fn enacted(&self) -> bool {
        self.retries().is_some()
    }

    /// Whether the retry budget is spent.
    pub fn expired(&self) -> bool {
        self.retries()
            .is_some_and(|retries| retries >= self.config.max_retries())
    }

    /// Outcomes of every attempt so far, oldest first. Empty unless recording.
    ///
    /// The guard holds only the log; the counters stay readable while it lives,
    /// but the policy cannot record another attempt until it is dropped.
    pub fn attempts(&self) -> MappedMutexGuard<'_, [Outcome<A::Output, A::Error>]> {
        MutexGuard::map(self.log.lock(), |log| log.as_mut_slice())
    }

    /// Delay after attempt `attempt` fails, or `None` after the last one.
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        self.config.delay_for_attempt(attempt)
    }

    /// Run the attempt loop.
    ///
    /// Claims the policy first: concurrent or repeated callers get the same
    /// rejection [`Action::validate`] would give.
    pub fn enact(&self) -> Result<A::Output, RetryError<A::Error>> {
        self.claim()?;

        let start = Instant::now();
        let max_retries = self.config.max_retries();
        let mut attempt = 0;

        loop {
            let outcome = self.action.perform_with(&*self.clock);
            if let Some(record) = self.recorder {
                self.log.lock().push(record(&outcome));
            }
            self.state.lock().retries = Some(attempt);

            let error = match outcome.into_result() {
                Ok(value) => {
                    tracing::debug!(
                        action = %self.action.describe(),
                        retries = attempt,
                        "attempt succeeded"
                    );
                    return Ok(value);
                }
                Err(error) => error,
            };

            match self.config.delay_for_attempt(attempt) {
                Some(delay) => {
                    tracing::warn!(
                        action = %self.action.describe(),
                        attempt = attempt + 1,
                        max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "attempt failed, retrying"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    attempt += 1;
                }
                None => {
                    tracing::warn!(
                        action = %self.action.describe(),
                        attempts = attempt + 1,
                        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                        "retries exhausted"
                    );
                    return Err(RetryError::Expired(RetryExhausted::new(
                        error,
                        attempt + 1,
                        max_retries,
                        start.elapsed(),
                    )));
                }
            }
        }
    }

    fn claim(&self) -> Result<(), RetryError<A::Error>> {
        let mut state = self.state.lock();
        self.check(&state)?;
        state.claimed = true;
        Ok(())
    }

    fn check(&self, state: &State) -> Result<(), RetryError<A::Error>> {
        let max_retries = self.config.max_retries();
        match state.retries {
            Some(retries) if retries >= max_retries => Err(RetryError::Expired(
                RetryExhausted::already_expired(retries + 1, max_retries),
            )),
            Some(retries) => Err(RetryError::Enacted { retries }),
            None if state.claimed => Err(RetryError::Enacted { retries: 0 }),
            None => Ok(()),
        }
    }
}

impl<A> RetryPolicy<A>
where
    A: Action,
    A::Output: Clone,
    A::Error: Clone,
{
    /// Keep every attempt's outcome, readable through
    /// [`attempts`](RetryPolicy::attempts).
    ///
    /// ```rust
    /// use actionpack::prelude::*;
    /// use actionpack::testing::Scripted;
    ///
    /// let policy = Scripted::failing(1, "busy", 7).retry(2).recording();
    /// policy.perform();
    ///
    /// let attempts = policy.attempts();
    /// assert_eq!(attempts.len(), 2);
    /// assert!(!attempts[0].successful());
    /// assert_eq!(attempts[1].value(), Some(&7));
    /// ```
    pub fn recording(mut self) -> Self {
        self.recorder = Some(Outcome::clone);
        self
    }
}

impl<A: Action> Action for RetryPolicy<A> {
    type Output = A::Output;
    type Error = RetryError<A::Error>;

    fn validate(&self) -> Result<(), Self::Error> {
        let state = self.state.lock();
        self.check(&state)
    }

    fn invoke(&self) -> Result<Self::Output, Self::Error> {
        self.enact()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref().or_else(|| self.action.name())
    }

    fn kind(&self) -> &'static str {
        "RetryPolicy"
    }

    fn describe(&self) -> String {
        let delay = self.config.delay_between_attempts();
        let body = if delay.is_zero() {
            format!("{} x {}", self.config.max_retries() + 1, self.action.describe())
        } else {
            format!(
                "{} x {} | {:?} delay",
                self.config.max_retries() + 1,
                self.action.describe(),
                delay
            )
        };
        match self.name() {
            Some(name) => format!("<{}({})|name=\"{}\">", self.kind(), body, name),
            None => format!("<{}({})>", self.kind(), body),
        }
    }
}

impl<A: Action> fmt::Display for RetryPolicy<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl<A: Action + fmt::Debug> fmt::Debug for RetryPolicy<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let retries = self.retries();
        let recorded = self.log.try_lock().map(|log| log.len());
        f.debug_struct("RetryPolicy")
            .field("action", &self.action)
            .field("config", &self.config)
            .field("name", &self.name)
            .field("should_record", &self.recorder.is_some())
            .field("retries", &retries)
            .field("recorded", &recorded)
            .finish()
    }
}

impl<A: Action + PartialEq> PartialEq for RetryPolicy<A> {
    fn eq(&self, other: &Self) -> bool {
        self.action == other.action
            && self.config == other.config
            && self.name == other.name
            && self.should_record() == other.should_record()
            && self.retries() == other.retries()
    }
}
