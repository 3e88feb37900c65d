//! AndThen combinator - builds the next action from the value of the previous one.

use crate::action::trait_def::Action;

/// AndThen combinator - a typed two-stage pipeline.
///
/// The first action is performed in full (validation, invocation, reaction). Its
/// value is handed to `f`, which builds the second action; the second action's
/// result is the result of the chain. A failing first stage short-circuits.
///
/// Both stages share one error type. Use `map_err` to line them up first:
///
/// ```rust,ignore
/// read_config()                           // Error = IoError
///     .map_err(AppError::from)            // Error = AppError
///     .and_then(|cfg| connect(cfg))       // Error = AppError
/// ```
///
/// # Example
///
/// ```
/// use actionpack::prelude::*;
///
/// fn lookup(id: &u32) -> Result<String, String> {
///     Ok(format!("user-{}", id))
/// }
///
/// fn greet(user: &String) -> Result<String, String> {
///     Ok(format!("hello {}", user))
/// }
///
/// let pipeline = Call::new(actionpack::closure!(lookup, 7))
///     .and_then(|user| Call::new(actionpack::closure!(greet, user)));
///
/// assert_eq!(pipeline.perform().into_result(), Ok("hello user-7".to_string()));
/// ```
pub struct AndThen<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner: std::fmt::Debug, F> std::fmt::Debug for AndThen<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndThen")
            .field("inner", &self.inner)
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, A2> Action for AndThen<Inner, F>
where
    Inner: Action,
    A2: Action<Error = Inner::Error>,
    F: Fn(Inner::Output) -> A2,
{
    type Output = A2::Output;
    type Error = Inner::Error;

    fn invoke(&self) -> Result<Self::Output, Self::Error> {
        let value = self.inner.perform().into_result()?;
        (self.f)(value).perform().into_result()
    }

    fn name(&self) -> Option<&str> {
        self.inner.name()
    }
}
