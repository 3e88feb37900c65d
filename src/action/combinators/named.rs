//! Named combinator - attaches a name to any action.

use crate::action::trait_def::Action;
use crate::clock::Clock;

/// An action with a name attached.
///
/// Keyed batch execution requires every member to be named; this is how actions
/// without their own naming support get one.
///
/// # Example
///
/// ```
/// use actionpack::prelude::*;
///
/// fn ping(_: &()) -> Result<&'static str, ()> {
///     Ok("pong")
/// }
///
/// let named = Call::new(actionpack::closure!(ping, ())).named("health");
/// assert_eq!(named.name(), Some("health"));
/// assert_eq!(named.describe(), "<Call|name=\"health\">");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Named<Inner> {
    pub(crate) inner: Inner,
    pub(crate) name: String,
}

impl<Inner> Named<Inner> {
    /// The wrapped action.
    pub fn inner(&self) -> &Inner {
        &self.inner
    }
}

impl<Inner: Action> Action for Named<Inner> {
    type Output = Inner::Output;
    type Error = Inner::Error;

    fn invoke(&self) -> Result<Self::Output, Self::Error> {
        self.inner.invoke()
    }

    fn validate(&self) -> Result<(), Self::Error> {
        self.inner.validate()
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    fn react(&self, should_raise: bool, clock: &dyn Clock) -> Result<(), Self::Error> {
        self.inner.react(should_raise, clock)
    }
}
