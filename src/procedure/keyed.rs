//! Procedures whose outcomes are labelled with their action's name.

use std::fmt;

use crate::action::Action;
use crate::procedure::error::ProcedureError;
use crate::procedure::execution::{KeyedExecution, Runs, TryKeyedExecution};
use crate::procedure::options::ExecuteOptions;
use crate::procedure::Procedure;

/// A [`Procedure`] in which every member is named.
///
/// Names are checked when the procedure is built, so a missing name is reported
/// before anything is performed. Duplicate names are allowed; every outcome is
/// yielded, paired with the name of the action that produced it.
///
/// # Examples
///
/// ```rust
/// use actionpack::prelude::*;
/// use actionpack::testing::Scripted;
///
/// let keyed = KeyedProcedure::new([
///     Scripted::<_, ()>::always(Ok(1)).named("one"),
///     Scripted::<_, ()>::always(Ok(2)).named("two"),
/// ])
/// .unwrap();
///
/// let results: Vec<(String, Option<i32>)> = keyed
///     .execute(ExecuteOptions::default())
///     .unwrap()
///     .map(|(name, outcome)| (name, outcome.into_result().ok()))
///     .collect();
///
/// assert_eq!(
///     results,
///     vec![("one".to_string(), Some(1)), ("two".to_string(), Some(2))]
/// );
///
/// // Unnamed members are rejected up front
/// let unnamed = KeyedProcedure::new([Scripted::<i32, ()>::always(Ok(3))]);
/// assert!(matches!(unnamed, Err(ProcedureError::UnnamedAction { position: 0, .. })));
/// ```
pub struct KeyedProcedure<A> {
    procedure: Procedure<A>,
    names: Vec<String>,
}

impl<A: Action> KeyedProcedure<A> {
    /// Collect named `actions` in order.
    pub fn new(actions: impl IntoIterator<Item = A>) -> Result<Self, ProcedureError> {
        Self::try_from(Procedure::new(actions))
    }

    /// The underlying procedure.
    pub fn procedure(&self) -> &Procedure<A> {
        &self.procedure
    }

    /// Member names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.procedure.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.procedure.is_empty()
    }

    /// Iterate over `(name, action)` pairs without performing anything.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &A)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.procedure.iter())
    }

    /// Check every member's preconditions, stopping at the first failure.
    pub fn validate(&self) -> Result<(), ProcedureError>
    where
        A::Error: fmt::Display,
    {
        self.procedure.validate()
    }
}

impl<A> KeyedProcedure<A>
where
    A: Action + Send + Sync + 'static,
    A::Output: Send + 'static,
    A::Error: Send + 'static,
{
    /// Perform every member, yielding `(name, outcome)` pairs.
    pub fn execute(
        &self,
        options: ExecuteOptions,
    ) -> Result<KeyedExecution<'_, A>, ProcedureError> {
        Ok(KeyedExecution {
            runs: Runs::start(self.procedure.shared(), A::perform_with, &options)?,
            names: &self.names,
        })
    }

    /// Perform every member, yielding the first failure as `Err` and stopping there.
    pub fn try_execute(
        &self,
        options: ExecuteOptions,
    ) -> Result<TryKeyedExecution<'_, A>, ProcedureError> {
        Ok(TryKeyedExecution {
            runs: Runs::start(self.procedure.shared(), A::try_perform_with, &options)?,
            names: &self.names,
            failed: false,
        })
    }
}

impl<A: Action> TryFrom<Procedure<A>> for KeyedProcedure<A> {
    type Error = ProcedureError;

    fn try_from(procedure: Procedure<A>) -> Result<Self, Self::Error> {
        let names = procedure
            .iter()
            .enumerate()
            .map(|(position, action)| match action.name() {
                Some(name) => Ok(name.to_string()),
                None => Err(ProcedureError::UnnamedAction {
                    position,
                    action: action.describe(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { procedure, names })
    }
}

impl<A> Clone for KeyedProcedure<A> {
    fn clone(&self) -> Self {
        Self {
            procedure: self.procedure.clone(),
            names: self.names.clone(),
        }
    }
}

impl<A: Action> fmt::Display for KeyedProcedure<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self.procedure.iter().map(Action::describe).collect();
        write!(f, "<KeyedProcedure({})>", members.join(", "))
    }
}

impl<A: fmt::Debug> fmt::Debug for KeyedProcedure<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedProcedure")
            .field("names", &self.names)
            .field("procedure", &self.procedure)
            .finish()
    }
}

