//! Map combinator - transforms the produced value of an action.

use crate::action::trait_def::Action;
use crate::clock::Clock;

/// Map combinator - transforms the produced value.
///
/// Validation, naming and reactions are those of the inner action.
///
/// # Example
///
/// ```
/// use actionpack::prelude::*;
///
/// fn answer(_: &()) -> Result<i32, String> {
///     Ok(21)
/// }
///
/// let doubled = Call::new(actionpack::closure!(answer, ())).map(|n| n * 2);
/// assert_eq!(doubled.perform().into_result(), Ok(42));
/// ```
pub struct Map<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner: std::fmt::Debug, F> std::fmt::Debug for Map<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("inner", &self.inner)
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, U> Action for Map<Inner, F>
where
    Inner: Action,
    F: Fn(Inner::Output) -> U,
{
    type Output = U;
    type Error = Inner::Error;

    fn invoke(&self) -> Result<U, Self::Error> {
        self.inner.invoke().map(&self.f)
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
        self.inner.react(should_raise, clock)
    }
}
