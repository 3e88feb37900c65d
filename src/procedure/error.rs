//! Error types for batch execution.

use std::fmt;
use std::io;

/// A procedure could not be built, validated or started.
#[derive(Debug)]
pub enum ProcedureError {
    /// A keyed procedure member has no name.
    UnnamedAction {
        /// Index of the member in declaration order.
        position: usize,
        /// Description of the offending action.
        action: String,
    },
    /// A member's precondition check failed.
    InvalidAction {
        /// Index of the member in declaration order.
        position: usize,
        /// Description of the offending action.
        action: String,
        /// The member's own validation failure, rendered.
        reason: String,
    },
    /// Concurrent execution was requested with no workers.
    NoWorkers,
    /// The worker pool could not be started.
    Runtime(io::Error),
}

impl fmt::Display for ProcedureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnnamedAction { position, action } => write!(
                f,
                "keyed procedure member {} ({}) has no name",
                position, action
            ),
            Self::InvalidAction {
                position,
                action,
                reason,
            } => write!(
                f,
                "procedure member {} ({}) failed validation: {}",
                position, action, reason
            ),
            Self::NoWorkers => write!(f, "concurrent execution needs at least one worker"),
            Self::Runtime(e) => write!(f, "failed to start worker pool: {}", e),
        }
    }
}

impl std::error::Error for ProcedureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ProcedureError {
    fn from(e: io::Error) -> Self {
        Self::Runtime(e)
    }
}
