//! Extension trait providing combinator methods for all Actions.
//!
//! The `ActionExt` trait is automatically implemented for all types that implement
//! [`Action`]. It provides composition (`map`, `map_err`, `and_then`), decoration
//! (`named`, `with_reaction`, `synchronized`), resilience (`retry`) and type erasure
//! (`boxed`).

use crate::action::boxed::BoxedAction;
use crate::action::combinators::{AndThen, Map, MapErr, Named, Synchronized, WithReaction};
use crate::action::trait_def::Action;
use crate::retry::RetryPolicy;
use crate::sync::PerformLock;

/// Extension trait providing combinator methods for all Actions.
///
/// This trait is automatically implemented for every `Action`. You don't need to
/// implement it yourself.
///
/// # Example
///
/// ```
/// use actionpack::prelude::*;
///
/// fn fetch(_: &()) -> Result<u32, String> {
///     Ok(20)
/// }
///
/// let action = Call::new(actionpack::closure!(fetch, ()))
///     .map(|n| n + 1)
///     .map_err(|e| format!("fetch failed: {}", e))
///     .named("fetch");
///
/// assert_eq!(action.name(), Some("fetch"));
/// assert_eq!(action.perform().into_result(), Ok(21));
/// ```
pub trait ActionExt: Action {
    /// Transform the produced value.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map { inner: self, f }
    }

    /// Transform the failure.
    fn map_err<E2, F>(self, f: F) -> MapErr<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Error) -> E2,
    {
        MapErr { inner: self, f }
    }

    /// Build the next action from this action's value.
    ///
    /// The next action must share this action's error type; use `map_err` to line
    /// them up.
    fn and_then<A2, F>(self, f: F) -> AndThen<Self, F>
    where
        Self: Sized,
        A2: Action<Error = Self::Error>,
        F: Fn(Self::Output) -> A2,
    {
        AndThen { inner: self, f }
    }

    /// Attach a name.
    fn named(self, name: impl Into<String>) -> Named<Self>
    where
        Self: Sized,
    {
        Named {
            inner: self,
            name: name.into(),
        }
    }

    /// Perform `reaction` after every attempt of this action.
    fn with_reaction<R>(self, reaction: R) -> WithReaction<Self, R>
    where
        Self: Sized,
        R: Action,
        Self::Error: From<R::Error>,
    {
        WithReaction::new(self, reaction)
    }

    /// Serialize performs of this action with every other action sharing `lock`.
    fn synchronized(self, lock: PerformLock) -> Synchronized<Self>
    where
        Self: Sized,
    {
        Synchronized { inner: self, lock }
    }

    /// Wrap this action in a [`RetryPolicy`] with `max_retries` extra attempts and
    /// default delays.
    fn retry(self, max_retries: u32) -> RetryPolicy<Self>
    where
        Self: Sized,
    {
        RetryPolicy::new(self, max_retries)
    }

    /// Erase the concrete type.
    fn boxed(self) -> BoxedAction<Self::Output, Self::Error>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Box::new(self)
    }
}

impl<A: Action + ?Sized> ActionExt for A {}
