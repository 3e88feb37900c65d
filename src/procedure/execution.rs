//! Lazy iterators over the outcomes of a running procedure.
//!
//! Sequential runs perform the next member only when the next item is pulled.
//! Concurrent runs dispatch every member up front onto a dedicated tokio runtime
//! whose blocking pool is capped at `max_workers`, then hand outcomes back as the
//! workers finish. Dropping a concurrent run waits for work already dispatched.

use std::fmt;
use std::iter::Enumerate;
use std::slice;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

use crate::action::Action;
use crate::clock::Clock;
use crate::outcome::Outcome;
use crate::procedure::error::ProcedureError;
use crate::procedure::options::ExecuteOptions;

/// What a single member run produces: performed or try-performed.
pub(crate) type Step<A, T> = fn(&A, &dyn Clock) -> T;

pub(crate) enum Runs<'a, A, T> {
    Sequential {
        actions: Enumerate<slice::Iter<'a, Arc<A>>>,
        step: Step<A, T>,
        clock: Arc<dyn Clock>,
    },
    Concurrent {
        runtime: Runtime,
        pending: FuturesUnordered<JoinHandle<(usize, T)>>,
    },
}

impl<'a, A, T> Runs<'a, A, T>
where
    A: Send + Sync + 'static,
    T: Send + 'static,
{
    pub(crate) fn start(
        actions: &'a [Arc<A>],
        step: Step<A, T>,
        options: &ExecuteOptions,
    ) -> Result<Self, ProcedureError> {
        let clock = Arc::clone(options.clock());

        if options.synchronously() {
            return Ok(Runs::Sequential {
                actions: actions.iter().enumerate(),
                step,
                clock,
            });
        }

        let max_workers = options.max_workers();
        if max_workers == 0 {
            return Err(ProcedureError::NoWorkers);
        }

        let runtime = Builder::new_current_thread()
            .max_blocking_threads(max_workers)
            .thread_name("actionpack-worker")
            .build()?;

        tracing::debug!(
            actions = actions.len(),
            max_workers,
            "dispatching procedure to worker pool"
        );

        let pending = actions
            .iter()
            .enumerate()
            .map(|(position, action)| {
                let action = Arc::clone(action);
                let clock = Arc::clone(&clock);
                runtime.spawn_blocking(move || (position, step(&*action, &*clock)))
            })
            .collect();

        Ok(Runs::Concurrent { runtime, pending })
    }
}

impl<A, T> Iterator for Runs<'_, A, T> {
    type Item = (usize, T);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Runs::Sequential {
                actions,
                step,
                clock,
            } => {
                let (position, action) = actions.next()?;
                Some((position, (*step)(&**action, &**clock)))
            }
            Runs::Concurrent { runtime, pending } => loop {
                match runtime.block_on(pending.next())? {
                    Ok(item) => return Some(item),
                    Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                    Err(err) => tracing::error!(error = %err, "procedure worker was cancelled"),
                }
            },
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Runs::Sequential { actions, .. } => actions.size_hint(),
            Runs::Concurrent { pending, .. } => (0, Some(pending.len())),
        }
    }
}

impl<A, T> fmt::Debug for Runs<'_, A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runs::Sequential { actions, .. } => f
                .debug_struct("Sequential")
                .field("remaining", &actions.len())
                .finish(),
            Runs::Concurrent { pending, .. } => f
                .debug_struct("Concurrent")
                .field("pending", &pending.len())
                .finish(),
        }
    }
}

/// Outcomes of [`Procedure::execute`](crate::Procedure::execute).
///
/// In sequential mode outcomes follow declaration order; in concurrent mode they
/// follow completion order.
#[derive(Debug)]
pub struct Execution<'a, A: Action> {
    pub(crate) runs: Runs<'a, A, Outcome<A::Output, A::Error>>,
}

impl<A: Action> Iterator for Execution<'_, A> {
    type Item = Outcome<A::Output, A::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runs.next().map(|(_, outcome)| outcome)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.runs.size_hint()
    }
}

/// Outcomes of [`Procedure::try_execute`](crate::Procedure::try_execute).
///
/// Yields `Err` for the first failing member, then ends. Members already
/// dispatched to the pool still run to completion.
#[derive(Debug)]
pub struct TryExecution<'a, A: Action> {
    pub(crate) runs: Runs<'a, A, Result<Outcome<A::Output, A::Error>, A::Error>>,
    pub(crate) failed: bool,
}

impl<A: Action> Iterator for TryExecution<'_, A> {
    type Item = Result<Outcome<A::Output, A::Error>, A::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (_, result) = self.runs.next()?;
        self.failed = result.is_err();
        Some(result)
    }
}

/// Named outcomes of [`KeyedProcedure::execute`](crate::KeyedProcedure::execute).
#[derive(Debug)]
pub struct KeyedExecution<'a, A: Action> {
    pub(crate) runs: Runs<'a, A, Outcome<A::Output, A::Error>>,
    pub(crate) names: &'a [String],
}

impl<A: Action> Iterator for KeyedExecution<'_, A> {
    type Item = (String, Outcome<A::Output, A::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let (position, outcome) = self.runs.next()?;
        Some((self.names[position].clone(), outcome))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.runs.size_hint()
    }
}

/// Named outcomes of [`KeyedProcedure::try_execute`](crate::KeyedProcedure::try_execute).
///
/// Yields `Err` for the first failing member, then ends.
#[derive(Debug)]
pub struct TryKeyedExecution<'a, A: Action> {
    pub(crate) runs: Runs<'a, A, Result<Outcome<A::Output, A::Error>, A::Error>>,
    pub(crate) names: &'a [String],
    pub(crate) failed: bool,
}

impl<A: Action> Iterator for TryKeyedExecution<'_, A> {
    type Item = Result<(String, Outcome<A::Output, A::Error>), A::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (position, result) = self.runs.next()?;
        self.failed = result.is_err();
        Some(result.map(|outcome| (self.names[position].clone(), outcome)))
    }
}
