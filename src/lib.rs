//! # Actionpack
//!
//! > *"Failures are values too"*
//!
//! A Rust library for performing units of work whose outcomes, good or bad, are
//! always handed back as data.
//!
//! ## Philosophy
//!
//! - An [`Action`] checks its preconditions and does its work. Performing it never
//!   panics on failure: the value or the failure comes back inside an [`Outcome`]
//!   stamped with the moment it was produced.
//! - A [`Procedure`] runs a batch of actions, one after another or on a bounded
//!   pool of worker threads.
//! - A [`RetryPolicy`] is itself an action: it performs another action until it
//!   succeeds, backing off between attempts.
//!
//! ## Quick Example
//!
//! ```rust
//! use actionpack::prelude::*;
//!
//! fn parse_port(text: &&'static str) -> Result<u16, String> {
//!     text.parse().map_err(|e| format!("{}: {}", text, e))
//! }
//!
//! let procedure = KeyedProcedure::new([
//!     Call::new(actionpack::closure!(parse_port, "8080")).with_name("http"),
//!     Call::new(actionpack::closure!(parse_port, "eighty")).with_name("admin"),
//! ])
//! .unwrap();
//!
//! for (name, outcome) in procedure.execute(ExecuteOptions::default()).unwrap() {
//!     match outcome.into_result() {
//!         Ok(port) => println!("{} listens on {}", name, port),
//!         Err(e) => println!("{} is misconfigured: {}", name, e),
//!     }
//! }
//! ```
//!
//! ## Retrying
//!
//! ```rust
//! use actionpack::prelude::*;
//! use actionpack::testing::Scripted;
//!
//! let policy = Scripted::failing(2, "connection reset", "payload").retry(3);
//! assert_eq!(policy.perform().into_result(), Ok("payload"));
//! assert_eq!(policy.retries(), Some(2));
//! ```
//!
//! For runnable programs, see the `demos` directory.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod action;
pub mod clock;
pub mod error;
pub mod outcome;
pub mod procedure;
pub mod retry;
pub mod sync;
pub mod testing;

// Re-exports
pub use action::{Action, ActionExt, BoxedAction, Call, Closure};
pub use clock::{Clock, SystemClock, Timestamp};
pub use error::ConstructionError;
pub use outcome::Outcome;
pub use procedure::{ExecuteOptions, KeyedProcedure, Procedure, ProcedureError};
pub use retry::{Backoff, RetryConfig, RetryError, RetryExhausted, RetryPolicy};
pub use sync::PerformLock;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionExt, BoxedAction, Call, Closure};
    pub use crate::outcome::Outcome;
    pub use crate::procedure::{ExecuteOptions, KeyedProcedure, Procedure, ProcedureError};
    pub use crate::retry::{Backoff, RetryError, RetryPolicy};
    pub use crate::sync::PerformLock;
}
