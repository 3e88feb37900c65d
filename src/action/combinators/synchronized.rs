//! Synchronized combinator - performs an action while holding a shared lock.

use crate::action::trait_def::Action;
use crate::clock::Clock;
use crate::outcome::Outcome;
use crate::sync::PerformLock;

/// An action performed wholly under a [`PerformLock`].
///
/// Validation, invocation and reaction of the inner action all run while the lock
/// is held, so two synchronized actions sharing a lock never interleave. Performing
/// goes through the inner action's own perform sequence, so a failing reaction is
/// raised under [`Action::try_perform`] exactly as it would be unsynchronized.
///
/// # Example
///
/// ```
/// use actionpack::prelude::*;
/// use actionpack::sync::PerformLock;
///
/// fn touch(_: &()) -> Result<(), String> {
///     Ok(())
/// }
///
/// let lock = PerformLock::new();
/// let first = Call::new(actionpack::closure!(touch, ())).synchronized(lock.clone());
/// let second = Call::new(actionpack::closure!(touch, ())).synchronized(lock);
/// assert!(first.perform().successful());
/// assert!(second.perform().successful());
/// ```
#[derive(Debug, Clone)]
pub struct Synchronized<Inner> {
    pub(crate) inner: Inner,
    pub(crate) lock: PerformLock,
}

impl<Inner> Synchronized<Inner> {
    /// The lock guarding this action.
    pub fn lock(&self) -> &PerformLock {
        &self.lock
    }
}

impl<Inner: Action> Action for Synchronized<Inner> {
    type Output = Inner::Output;
    type Error = Inner::Error;

    fn invoke(&self) -> Result<Self::Output, Self::Error> {
        let _guard = self.lock.acquire();
        self.inner.invoke()
    }

    fn validate(&self) -> Result<(), Self::Error> {
        let _guard = self.lock.acquire();
        self.inner.validate()
    }

    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn react(&self, should_raise: bool, clock: &dyn Clock) -> Result<(), Self::Error> {
        let _guard = self.lock.acquire();
        self.inner.react(should_raise, clock)
    }

    fn perform_with(&self, clock: &dyn Clock) -> Outcome<Self::Output, Self::Error> {
        let _guard = self.lock.acquire();
        self.inner.perform_with(clock)
    }

    fn try_perform_with(
        &self,
        clock: &dyn Clock,
    ) -> Result<Outcome<Self::Output, Self::Error>, Self::Error> {
        let _guard = self.lock.acquire();
        self.inner.try_perform_with(clock)
    }
}
