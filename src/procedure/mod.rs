//! Batch execution of homogeneous actions.
//!
//! A [`Procedure`] is an ordered collection of actions that can be executed
//! sequentially (lazily, in declaration order) or concurrently (on a bounded pool of
//! worker threads, in completion order). A [`KeyedProcedure`] does the same but
//! labels every outcome with its action's name.
//!
//! Executing never consumes the procedure: the same collection can be executed
//! again, and iterated on its own, as often as needed.
//!
//! Heterogeneous batches use [`BoxedAction`](crate::BoxedAction):
//!
//! ```rust
//! use actionpack::prelude::*;
//! use actionpack::testing::Scripted;
//!
//! let procedure: Procedure<BoxedAction<i32, String>> = Procedure::new(vec![
//!     Scripted::always(Ok(1)).boxed(),
//!     Scripted::always(Ok(2)).map(|n: i32| n * 10).boxed(),
//!     Scripted::always(Err("nope".to_string())).boxed(),
//! ]);
//!
//! let outcomes: Vec<_> = procedure
//!     .execute(ExecuteOptions::default())
//!     .unwrap()
//!     .map(Outcome::into_result)
//!     .collect();
//!
//! assert_eq!(outcomes, vec![Ok(1), Ok(20), Err("nope".to_string())]);
//! ```
//!
//! Concurrent execution must not be started from inside an async runtime: it
//! drives its own.

mod error;
mod execution;
mod keyed;
mod options;

pub use error::ProcedureError;
pub use execution::{Execution, KeyedExecution, TryExecution, TryKeyedExecution};
pub use keyed::KeyedProcedure;
pub use options::{ExecuteOptions, DEFAULT_MAX_WORKERS};

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::action::Action;
use execution::Runs;

/// An ordered batch of actions.
///
/// # Examples
///
/// ```rust
/// use actionpack::prelude::*;
/// use actionpack::testing::Scripted;
///
/// let procedure = Procedure::new([
///     Scripted::always(Ok("first")),
///     Scripted::always(Err("second failed")),
/// ]);
///
/// let outcomes: Vec<_> = procedure.execute(ExecuteOptions::default()).unwrap().collect();
/// assert!(outcomes[0].successful());
/// assert!(!outcomes[1].successful());
///
/// // The raising mode stops at the first failure
/// let raised: Vec<_> = procedure.try_execute(ExecuteOptions::default()).unwrap().collect();
/// assert_eq!(raised.len(), 2);
/// assert_eq!(raised[1].as_ref().unwrap_err(), &"second failed");
/// ```
pub struct Procedure<A> {
    actions: Vec<Arc<A>>,
}

impl<A: Action> Procedure<A> {
    /// Collect `actions` in order.
    pub fn new(actions: impl IntoIterator<Item = A>) -> Self {
        Self {
            actions: actions.into_iter().map(Arc::new).collect(),
        }
    }

    /// Collect actions that are also held elsewhere.
    pub fn from_shared(actions: impl IntoIterator<Item = Arc<A>>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over the members in declaration order without performing them.
    pub fn iter(&self) -> impl Iterator<Item = &A> + '_ {
        self.actions.iter().map(|action| &**action)
    }

    /// Check every member's preconditions, stopping at the first failure.
    ///
    /// Only [`Action::validate`] is called; nothing is invoked.
    pub fn validate(&self) -> Result<(), ProcedureError>
    where
        A::Error: fmt::Display,
    {
        for (position, action) in self.iter().enumerate() {
            action
                .validate()
                .map_err(|reason| ProcedureError::InvalidAction {
                    position,
                    action: action.describe(),
                    reason: reason.to_string(),
                })?;
        }
        Ok(())
    }

    pub(crate) fn shared(&self) -> &[Arc<A>] {
        &self.actions
    }
}

impl<A> Procedure<A>
where
    A: Action + Send + Sync + 'static,
    A::Output: Send + 'static,
    A::Error: Send + 'static,
{
    /// Perform every member, yielding each outcome.
    ///
    /// Failures are captured in the outcomes. Sequential execution is lazy: a member
    /// is performed when its outcome is pulled.
    ///
    /// # Errors
    ///
    /// [`ProcedureError::NoWorkers`] or [`ProcedureError::Runtime`] when concurrent
    /// execution cannot start.
    pub fn execute(&self, options: ExecuteOptions) -> Result<Execution<'_, A>, ProcedureError> {
        Ok(Execution {
            runs: Runs::start(&self.actions, A::perform_with, &options)?,
        })
    }

    /// Perform every member, yielding the first failure as `Err` and stopping there.
    pub fn try_execute(
        &self,
        options: ExecuteOptions,
    ) -> Result<TryExecution<'_, A>, ProcedureError> {
        Ok(TryExecution {
            runs: Runs::start(&self.actions, A::try_perform_with, &options)?,
            failed: false,
        })
    }
}

impl<A> Clone for Procedure<A> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
        }
    }
}

impl<A: Action> FromIterator<A> for Procedure<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a, A: Action> IntoIterator for &'a Procedure<A> {
    type Item = &'a A;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, Arc<A>>, fn(&'a Arc<A>) -> &'a A>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions
            .iter()
            .map(<Arc<A> as Deref>::deref as fn(&'a Arc<A>) -> &'a A)
    }
}

impl<A: PartialEq> PartialEq for Procedure<A> {
    fn eq(&self, other: &Self) -> bool {
        self.actions.len() == other.actions.len()
            && self
                .actions
                .iter()
                .zip(&other.actions)
                .all(|(a, b)| **a == **b)
    }
}

impl<A: Action> fmt::Display for Procedure<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self.iter().map(Action::describe).collect();
        write!(f, "<Procedure({})>", members.join(", "))
    }
}

impl<A: fmt::Debug> fmt::Debug for Procedure<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Procedure")
            .field("actions", &self.actions)
            .finish()
    }
}
