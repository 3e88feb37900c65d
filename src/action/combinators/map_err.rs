//! MapErr combinator - transforms the failure of an action.

use crate::action::trait_def::Action;
use crate::clock::Clock;

/// MapErr combinator - transforms the failure.
///
/// Useful for converting error types so actions can be chained with `and_then` or
/// batched together.
///
/// # Example
///
/// ```
/// use actionpack::prelude::*;
///
/// fn broken(_: &()) -> Result<i32, &'static str> {
///     Err("disk full")
/// }
///
/// let wrapped = Call::new(actionpack::closure!(broken, ()))
///     .map_err(|e| format!("while saving: {}", e));
/// assert_eq!(
///     wrapped.perform().into_result(),
///     Err("while saving: disk full".to_string())
/// );
/// ```
pub struct MapErr<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner: std::fmt::Debug, F> std::fmt::Debug for MapErr<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapErr")
            .field("inner", &self.inner)
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, E2> Action for MapErr<Inner, F>
where
    Inner: Action,
    F: Fn(Inner::Error) -> E2,
{
    type Output = Inner::Output;
    type Error = E2;

    fn invoke(&self) -> Result<Self::Output, E2> {
        self.inner.invoke().map_err(&self.f)
    }

    fn validate(&self) -> Result<(), E2> {
        self.inner.validate().map_err(&self.f)
    }

    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    fn react(&self, should_raise: bool, clock: &dyn Clock) -> Result<(), E2> {
        self.inner.react(should_raise, clock).map_err(&self.f)
    }
}
