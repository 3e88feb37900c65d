//! How a procedure runs its members.

use std::fmt;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};

/// Worker count used by concurrent execution unless configured.
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// Execution mode for [`Procedure::execute`](crate::Procedure::execute).
///
/// Defaults to sequential execution in declaration order. Concurrent execution
/// runs every member on a pool of at most `max_workers` threads and yields outcomes
/// in completion order.
///
/// ```rust
/// use actionpack::ExecuteOptions;
///
/// let options = ExecuteOptions::default();
/// assert!(options.synchronously());
/// assert_eq!(options.max_workers(), 5);
///
/// let options = ExecuteOptions::default().concurrently(8);
/// assert!(!options.synchronously());
/// assert_eq!(options.max_workers(), 8);
/// ```
#[derive(Clone)]
pub struct ExecuteOptions {
    max_workers: usize,
    synchronously: bool,
    clock: Arc<dyn Clock>,
}

impl ExecuteOptions {
    /// Run members one after another, in declaration order.
    pub fn sequentially(mut self) -> Self {
        self.synchronously = true;
        self
    }

    /// Run members on a pool of `max_workers` threads.
    pub fn concurrently(mut self, max_workers: usize) -> Self {
        self.synchronously = false;
        self.max_workers = max_workers;
        self
    }

    /// Set the pool size without changing the mode.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Timestamp outcomes with `clock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Pool size for concurrent execution.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Whether members run sequentially.
    pub fn synchronously(&self) -> bool {
        self.synchronously
    }

    /// The clock outcomes are stamped with.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            synchronously: true,
            clock: Arc::new(SystemClock),
        }
    }
}

impl fmt::Debug for ExecuteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteOptions")
            .field("max_workers", &self.max_workers)
            .field("synchronously", &self.synchronously)
            .finish_non_exhaustive()
    }
}
