//! Caller-owned locks for serializing performs.
//!
//! Performing an action takes no lock of its own. When several actions touch the
//! same unsynchronized state, share one [`PerformLock`] between them and wrap each
//! in [`Synchronized`](crate::action::Synchronized) via
//! [`ActionExt::synchronized`](crate::ActionExt::synchronized). At most one of them
//! is performed at a time; a thread that already holds the lock may perform another
//! action guarded by it without deadlocking.

use std::fmt;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// A reentrant lock shared by the actions it serializes. Cloning shares the lock.
#[derive(Clone)]
pub struct PerformLock {
    inner: Arc<ReentrantMutex<()>>,
}

impl PerformLock {
    /// Create a fresh, unshared lock.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// Block until the lock is held by the current thread.
    pub fn acquire(&self) -> ReentrantMutexGuard<'_, ()> {
        self.inner.lock()
    }

    /// True when both handles guard the same lock.
    pub fn same_as(&self, other: &PerformLock) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for PerformLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PerformLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerformLock")
            .field("locked", &self.inner.is_locked())
            .finish()
    }
}
