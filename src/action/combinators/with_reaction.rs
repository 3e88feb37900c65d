//! WithReaction combinator - a side-effect action performed after every attempt.

use parking_lot::Mutex;

use crate::action::trait_def::Action;
use crate::clock::Clock;
use crate::outcome::Outcome;

/// An action followed by a reaction.
///
/// The reaction is performed after every attempt of the primary action, whether
/// validation or invocation failed or not. Its outcomes are kept until drained with
/// [`take_reactions`](WithReaction::take_reactions). The log grows with every
/// perform, so a long-lived action that is never drained should cap it with
/// [`retaining`](WithReaction::retaining).
///
/// Under the raising path ([`Action::try_perform`]) a failing reaction is returned as
/// the primary action's error (converted with `From`), unless the primary step failed
/// first, in which case the primary failure wins.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use actionpack::prelude::*;
///
/// static NOTIFIED: AtomicUsize = AtomicUsize::new(0);
///
/// fn work(_: &()) -> Result<u8, String> {
///     Err("nope".to_string())
/// }
///
/// fn notify(_: &()) -> Result<(), String> {
///     NOTIFIED.fetch_add(1, Ordering::SeqCst);
///     Ok(())
/// }
///
/// let action = Call::new(actionpack::closure!(work, ()))
///     .with_reaction(Call::new(actionpack::closure!(notify, ())));
///
/// assert!(!action.perform().successful());
/// assert_eq!(NOTIFIED.load(Ordering::SeqCst), 1);
/// assert_eq!(action.take_reactions().len(), 1);
/// ```
pub struct WithReaction<Inner, R: Action> {
    pub(crate) inner: Inner,
    pub(crate) reaction: R,
    pub(crate) outcomes: Mutex<Vec<Outcome<R::Output, R::Error>>>,
    pub(crate) limit: Option<usize>,
}

impl<Inner, R: Action> WithReaction<Inner, R> {
    pub(crate) fn new(inner: Inner, reaction: R) -> Self {
        Self {
            inner,
            reaction,
            outcomes: Mutex::new(Vec::new()),
            limit: None,
        }
    }

    /// Keep only the `limit` most recent reaction outcomes. Zero keeps none.
    pub fn retaining(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn keep(&self, outcome: Outcome<R::Output, R::Error>) {
        let mut outcomes = self.outcomes.lock();
        outcomes.push(outcome);
        if let Some(limit) = self.limit {
            let excess = outcomes.len().saturating_sub(limit);
            outcomes.drain(..excess);
        }
    }

    /// Drain the outcomes of every reaction performed so far, oldest first.
    pub fn take_reactions(&self) -> Vec<Outcome<R::Output, R::Error>> {
        std::mem::take(&mut *self.outcomes.lock())
    }

    /// The primary action.
    pub fn inner(&self) -> &Inner {
        &self.inner
    }

    /// The reaction.
    pub fn reaction(&self) -> &R {
        &self.reaction
    }
}

impl<Inner, R> std::fmt::Debug for WithReaction<Inner, R>
where
    Inner: std::fmt::Debug,
    R: Action + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithReaction")
            .field("inner", &self.inner)
            .field("reaction", &self.reaction)
            .field("pending_outcomes", &self.outcomes.lock().len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl<Inner, R> Action for WithReaction<Inner, R>
where
    Inner: Action,
    R: Action,
    Inner::Error: From<R::Error>,
{
    type Output = Inner::Output;
    type Error = Inner::Error;

    fn invoke(&self) -> Result<Self::Output, Self::Error> {
        self.inner.invoke()
    }

    fn validate(&self) -> Result<(), Self::Error> {
        self.inner.validate()
    }

    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    fn react(&self, should_raise: bool, clock: &dyn Clock) -> Result<(), Self::Error> {
        let inner = self.inner.react(should_raise, clock);

        if should_raise {
            let outcome = self.reaction.try_perform_with(clock)?;
            self.keep(outcome);
        } else {
            let outcome = self.reaction.perform_with(clock);
            if !outcome.successful() {
                tracing::debug!(reaction = %self.reaction.describe(), "reaction failed");
            }
            self.keep(outcome);
        }

        inner
    }
}
