//! BoxedAction - type-erased action for heterogeneous batches.
//!
//! A [`Procedure`](crate::Procedure) holds one action type. To batch actions of
//! different concrete types that agree on output and error, erase them:
//!
//! ```
//! use actionpack::prelude::*;
//!
//! fn one(_: &()) -> Result<i32, String> { Ok(1) }
//! fn two(_: &()) -> Result<i32, String> { Ok(2) }
//!
//! let actions: Vec<BoxedAction<i32, String>> = vec![
//!     Call::new(actionpack::closure!(one, ())).boxed(),
//!     Call::new(actionpack::closure!(two, ())).map(|n| n * 10).boxed(),
//! ];
//!
//! let procedure = Procedure::new(actions);
//! let values: Vec<i32> = procedure
//!     .execute(ExecuteOptions::default())
//!     .unwrap()
//!     .filter_map(|outcome| outcome.into_result().ok())
//!     .collect();
//! assert_eq!(values, vec![1, 20]);
//! ```

use crate::action::trait_def::Action;

/// A boxed action that can be sent to and shared with worker threads.
pub type BoxedAction<T, E> = Box<dyn Action<Output = T, Error = E> + Send + Sync>;
