//! Action trait definition - the unit-of-work contract.
//!
//! An [`Action`] knows how to check its preconditions ([`Action::validate`]) and how
//! to do its work ([`Action::invoke`]). Callers never call those directly: they go
//! through [`Action::perform`], which turns every failure into a value, or through
//! [`Action::try_perform`] when they want failures handed back as `Err`.
//!
//! # Perform sequence
//!
//! 1. `validate()`; a failure here skips `invoke()`.
//! 2. `invoke()`.
//! 3. `react()`, unconditionally, whatever happened in 1 and 2.
//! 4. Wrap the payload together with the clock reading into an [`Outcome`].

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::outcome::Outcome;

/// A unit of work whose success and failure are both ordinary values.
///
/// `invoke` takes `&self`: actions that need mutable state keep it behind interior
/// mutability, which lets the same action be shared with worker threads by
/// [`Procedure`](crate::Procedure).
///
/// # Example
///
/// ```
/// use actionpack::Action;
///
/// struct Divide {
///     numerator: i32,
///     denominator: i32,
/// }
///
/// impl Action for Divide {
///     type Output = i32;
///     type Error = String;
///
///     fn validate(&self) -> Result<(), String> {
///         if self.denominator == 0 {
///             return Err("division by zero".to_string());
///         }
///         Ok(())
///     }
///
///     fn invoke(&self) -> Result<i32, String> {
///         Ok(self.numerator / self.denominator)
///     }
/// }
///
/// let ok = Divide { numerator: 9, denominator: 3 }.perform();
/// assert_eq!(ok.value(), Some(&3));
///
/// let failed = Divide { numerator: 9, denominator: 0 }.perform();
/// assert_eq!(failed.error().map(String::as_str), Some("division by zero"));
///
/// // The raising path hands the failure back directly
/// let raised = Divide { numerator: 1, denominator: 0 }.try_perform();
/// assert_eq!(raised.unwrap_err(), "division by zero");
/// ```
pub trait Action {
    /// The value produced on success.
    type Output;

    /// The failure produced by validation or invocation.
    type Error;

    /// Do the work.
    fn invoke(&self) -> Result<Self::Output, Self::Error>;

    /// Check preconditions before invoking. Defaults to no check.
    fn validate(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Optional label, used by keyed batch execution.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Short name of the concrete action type.
    fn kind(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Human-readable form: `<Kind>` or `<Kind|name="...">`.
    fn describe(&self) -> String {
        match self.name() {
            Some(name) => format!("<{}|name=\"{}\">", self.kind(), name),
            None => format!("<{}>", self.kind()),
        }
    }

    /// Side effect run after every attempt, whatever its result.
    ///
    /// Under the raising path (`should_raise`), a failing side effect is returned as
    /// `Err`; otherwise it must be captured by the implementor. Defaults to nothing.
    fn react(&self, should_raise: bool, clock: &dyn Clock) -> Result<(), Self::Error> {
        let _ = (should_raise, clock);
        Ok(())
    }

    /// Perform the action, capturing any failure in the returned [`Outcome`].
    fn perform(&self) -> Outcome<Self::Output, Self::Error> {
        self.perform_with(&SystemClock)
    }

    /// [`perform`](Action::perform) with an explicit clock.
    fn perform_with(&self, clock: &dyn Clock) -> Outcome<Self::Output, Self::Error> {
        match attempt(self, false, clock) {
            Ok(outcome) => outcome,
            Err(error) => Outcome::new(Err(error), clock),
        }
    }

    /// Perform the action, returning a failure as `Err` instead of a failed outcome.
    ///
    /// On `Ok`, the outcome is always successful.
    fn try_perform(&self) -> Result<Outcome<Self::Output, Self::Error>, Self::Error> {
        self.try_perform_with(&SystemClock)
    }

    /// [`try_perform`](Action::try_perform) with an explicit clock.
    fn try_perform_with(
        &self,
        clock: &dyn Clock,
    ) -> Result<Outcome<Self::Output, Self::Error>, Self::Error> {
        attempt(self, true, clock)
    }
}

fn attempt<A: Action + ?Sized>(
    action: &A,
    should_raise: bool,
    clock: &dyn Clock,
) -> Result<Outcome<A::Output, A::Error>, A::Error> {
    let result = action.validate().and_then(|()| action.invoke());
    let reaction = action.react(should_raise, clock);

    if result.is_err() {
        tracing::debug!(action = %action.describe(), should_raise, "action failed");
    }

    if should_raise {
        let value = result?;
        reaction?;
        return Ok(Outcome::new(Ok(value), clock));
    }

    // Without raising, a reaction failure must already be captured by its owner.
    Ok(Outcome::new(result, clock))
}

/// Strip module path and generic arguments from a type name.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

macro_rules! forward_action {
    ($($wrapper:ident),*) => {$(
        impl<A: Action + ?Sized> Action for $wrapper<A> {
            type Output = A::Output;
            type Error = A::Error;

            fn invoke(&self) -> Result<Self::Output, Self::Error> {
                (**self).invoke()
            }

            fn validate(&self) -> Result<(), Self::Error> {
                (**self).validate()
            }

            fn name(&self) -> Option<&str> {
                (**self).name()
            }

            fn kind(&self) -> &'static str {
                (**self).kind()
            }

            fn describe(&self) -> String {
                (**self).describe()
            }

            fn react(&self, should_raise: bool, clock: &dyn Clock) -> Result<(), Self::Error> {
                (**self).react(should_raise, clock)
            }
        }
    )*};
}

forward_action!(Box, Arc);
