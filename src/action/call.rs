//! The call-a-function action.

use crate::action::closure::Closure;
use crate::action::trait_def::Action;

/// Perform a [`Closure`] as an action.
///
/// # Example
///
/// ```
/// use actionpack::prelude::*;
///
/// fn parse(text: &&'static str) -> Result<u16, std::num::ParseIntError> {
///     text.parse()
/// }
///
/// let port = Call::new(actionpack::closure!(parse, "8080")).with_name("port");
/// assert_eq!(port.describe(), "<Call|name=\"port\">");
/// assert_eq!(port.perform().value(), Some(&8080));
///
/// let bad = Call::new(actionpack::closure!(parse, "eighty"));
/// assert!(!bad.perform().successful());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Call<Args, T, E> {
    closure: Closure<Args, T, E>,
    name: Option<String>,
}

impl<Args, T, E> Call<Args, T, E> {
    /// Wrap a closure.
    pub fn new(closure: Closure<Args, T, E>) -> Self {
        Self {
            closure,
            name: None,
        }
    }

    /// Attach a name, used as the key in keyed batch results.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The wrapped closure.
    pub fn closure(&self) -> &Closure<Args, T, E> {
        &self.closure
    }
}

impl<Args, T, E> Action for Call<Args, T, E> {
    type Output = T;
    type Error = E;

    fn invoke(&self) -> Result<T, E> {
        self.closure.call()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn kind(&self) -> &'static str {
        "Call"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail_on_zero(n: &i64) -> Result<i64, String> {
        if *n == 0 {
            Err("zero".to_string())
        } else {
            Ok(100 / n)
        }
    }

    #[test]
    fn test_call_success_and_failure() {
        let ok = Call::new(crate::closure!(fail_on_zero, 4));
        assert_eq!(ok.perform().into_result(), Ok(25));

        let failed = Call::new(crate::closure!(fail_on_zero, 0));
        assert_eq!(failed.perform().into_result(), Err("zero".to_string()));
    }

    #[test]
    fn test_describe_without_name() {
        let call = Call::new(crate::closure!(fail_on_zero, 1));
        assert_eq!(call.describe(), "<Call>");
        assert_eq!(call.name(), None);
    }

    #[test]
    fn test_equality_covers_name() {
        let a = Call::new(crate::closure!(fail_on_zero, 1)).with_name("a");
        let b = Call::new(crate::closure!(fail_on_zero, 1)).with_name("a");
        let c = Call::new(crate::closure!(fail_on_zero, 1)).with_name("c");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
