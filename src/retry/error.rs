//! Error types for retry operations.

use std::fmt;
use std::time::Duration;

/// Why a [`RetryPolicy`](crate::RetryPolicy) did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every allowed attempt failed, or the policy had already used them all.
    Expired(RetryExhausted<E>),
    /// The policy was already enacted and will not run again.
    Enacted {
        /// Retries spent by the earlier enactment.
        retries: u32,
    },
}

impl<E> RetryError<E> {
    /// Returns true if the policy ran out of attempts.
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired(_))
    }

    /// Returns true if the policy refused to run a second time.
    pub fn is_enacted(&self) -> bool {
        matches!(self, Self::Enacted { .. })
    }

    /// The failure from the last attempt, if this enactment made any.
    pub fn final_error(&self) -> Option<&E> {
        match self {
            Self::Expired(exhausted) => exhausted.final_error.as_ref(),
            Self::Enacted { .. } => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired(exhausted) => write!(f, "{}", exhausted),
            Self::Enacted { retries } => write!(
                f,
                "retry policy already enacted after {} retries; it will not run again",
                retries
            ),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Expired(exhausted) => exhausted.source(),
            Self::Enacted { .. } => None,
        }
    }
}

/// Error returned when all retry attempts are exhausted.
///
/// Contains the final error along with metadata about the retry sequence.
///
/// # Examples
///
/// ```rust
/// use actionpack::prelude::*;
/// use actionpack::testing::Scripted;
/// use actionpack::RetryError;
///
/// let policy = Scripted::<(), _>::always(Err("always fails")).retry(2);
///
/// match policy.perform().into_result() {
///     Err(RetryError::Expired(exhausted)) => {
///         assert_eq!(exhausted.final_error, Some("always fails"));
///         assert_eq!(exhausted.attempts, 3); // 1 initial + 2 retries
///     }
///     other => panic!("Expected expiry, got {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// The error from the final attempt.
    ///
    /// `None` when the policy had already expired before this perform.
    pub final_error: Option<E>,
    /// Attempts made (initial + retries).
    pub attempts: u32,
    /// Configured retry limit.
    pub max_retries: u32,
    /// Time spent retrying.
    pub total_duration: Duration,
}

impl<E> RetryExhausted<E> {
    /// Create a new RetryExhausted error.
    pub fn new(final_error: E, attempts: u32, max_retries: u32, total_duration: Duration) -> Self {
        Self {
            final_error: Some(final_error),
            attempts,
            max_retries,
            total_duration,
        }
    }

    /// A policy that had already spent its attempts was asked to run again.
    pub fn already_expired(attempts: u32, max_retries: u32) -> Self {
        Self {
            final_error: None,
            attempts,
            max_retries,
            total_duration: Duration::ZERO,
        }
    }

    /// Extract the final error, discarding metadata.
    pub fn into_error(self) -> Option<E> {
        self.final_error
    }

    /// Get a reference to the final error.
    pub fn error(&self) -> Option<&E> {
        self.final_error.as_ref()
    }
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.final_error {
            Some(error) => write!(
                f,
                "retry exhausted after {} attempts ({:?}): {}",
                self.attempts, self.total_duration, error
            ),
            None => write!(
                f,
                "retry policy expired after {} attempts (max_retries={})",
                self.attempts, self.max_retries
            ),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryExhausted<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.final_error
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_exhausted_display() {
        let err = RetryExhausted::new("connection failed", 3, 2, Duration::from_millis(500));
        let display = format!("{}", err);
        assert!(display.contains("retry exhausted"));
        assert!(display.contains("3 attempts"));
        assert!(display.contains("connection failed"));
    }

    #[test]
    fn test_already_expired_display() {
        let err: RetryExhausted<String> = RetryExhausted::already_expired(4, 3);
        assert_eq!(
            err.to_string(),
            "retry policy expired after 4 attempts (max_retries=3)"
        );
        assert!(err.into_error().is_none());
    }

    #[test]
    fn test_retry_error_accessors() {
        let expired = RetryError::Expired(RetryExhausted::new("e", 1, 0, Duration::ZERO));
        assert!(expired.is_expired());
        assert_eq!(expired.final_error(), Some(&"e"));

        let enacted: RetryError<&str> = RetryError::Enacted { retries: 2 };
        assert!(enacted.is_enacted());
        assert_eq!(enacted.final_error(), None);
        assert!(enacted.to_string().contains("already enacted after 2 retries"));
    }

    #[test]
    fn test_source_is_final_error() {
        use std::error::Error;

        let io = std::io::Error::other("disk");
        let err = RetryError::Expired(RetryExhausted::new(io, 2, 1, Duration::ZERO));
        assert_eq!(err.source().map(|e| e.to_string()), Some("disk".to_string()));

        let enacted: RetryError<std::io::Error> = RetryError::Enacted { retries: 0 };
        assert!(enacted.source().is_none());
    }
}
