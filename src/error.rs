//! Construction-time failures.
//!
//! Building an action with bad arguments never yields a half-working action.
//! Fallible constructors return `Result<_, ConstructionError>` instead, so the
//! failure is visible before anything is performed.

use std::fmt;

/// An action or policy could not be built from the given arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// A closure was given an empty name.
    AnonymousClosure,
    /// Jitter must be a whole percentage in `0..=100`.
    JitterOutOfRange(u8),
    /// A backoff strategy name did not match any known strategy.
    UnknownBackoff(String),
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnonymousClosure => write!(f, "closures must be named"),
            Self::JitterOutOfRange(p) => {
                write!(f, "jitter percentage must be within 0..=100, got {}", p)
            }
            Self::UnknownBackoff(name) => write!(f, "unknown backoff strategy: {:?}", name),
        }
    }
}

impl std::error::Error for ConstructionError {}
