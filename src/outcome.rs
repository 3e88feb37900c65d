//! The immutable record of a single attempt.
//!
//! An [`Outcome`] is what every entry point of this crate hands back: the value an
//! action produced, or the failure it ran into, together with the moment it was
//! produced. Outcomes are created once by the crate and never change afterwards;
//! all fields are private and only readable.
//!
//! ```compile_fail
//! use actionpack::prelude::*;
//!
//! fn forty_two(_: &()) -> Result<i32, String> { Ok(42) }
//!
//! let outcome = Call::new(actionpack::closure!(forty_two, ())).perform();
//! outcome.produced_at = actionpack::clock::Timestamp::from_micros(0);
//! ```

use std::fmt;

use crate::clock::{Clock, Timestamp};

/// Result of one invocation attempt plus its creation time.
///
/// # Example
///
/// ```
/// use actionpack::prelude::*;
///
/// fn halve(n: &u32) -> Result<u32, String> {
///     if n % 2 == 0 { Ok(n / 2) } else { Err(format!("{} is odd", n)) }
/// }
///
/// let ok = Call::new(actionpack::closure!(halve, 10)).perform();
/// assert!(ok.successful());
/// assert_eq!(ok.value(), Some(&5));
///
/// let failed = Call::new(actionpack::closure!(halve, 3)).perform();
/// assert!(!failed.successful());
/// assert_eq!(failed.error().map(String::as_str), Some("3 is odd"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Outcome<T, E> {
    value: Result<T, E>,
    produced_at: Timestamp,
}

impl<T, E> Outcome<T, E> {
    pub(crate) fn new(value: Result<T, E>, clock: &dyn Clock) -> Self {
        Self {
            value,
            produced_at: clock.now(),
        }
    }

    /// True iff the attempt produced a value without failing.
    pub fn successful(&self) -> bool {
        self.value.is_ok()
    }

    /// The produced value, if the attempt succeeded.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref().ok()
    }

    /// The captured failure, if the attempt failed.
    pub fn error(&self) -> Option<&E> {
        self.value.as_ref().err()
    }

    /// Borrow the payload as a standard `Result`.
    pub fn as_result(&self) -> Result<&T, &E> {
        self.value.as_ref()
    }

    /// Consume the outcome, keeping only the payload.
    pub fn into_result(self) -> Result<T, E> {
        self.value
    }

    /// When the outcome was created.
    pub fn produced_at(&self) -> Timestamp {
        self.produced_at
    }
}

impl<T, E> fmt::Display for Outcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.successful() {
            "success"
        } else {
            "failure"
        };
        write!(f, "<Outcome|{}>", label)
    }
}
