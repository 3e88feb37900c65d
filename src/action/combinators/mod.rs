//! Combinator types for action composition.
//!
//! These are the concrete types returned by the methods on
//! [`ActionExt`](crate::ActionExt). They hold the wrapped action by value and do not
//! allocate; use [`ActionExt::boxed`](crate::ActionExt::boxed) when type erasure is
//! needed.

mod and_then;
mod map;
mod map_err;
mod named;
mod synchronized;
mod with_reaction;

pub use and_then::AndThen;
pub use map::Map;
pub use map_err::MapErr;
pub use named::Named;
pub use synchronized::Synchronized;
pub use with_reaction::WithReaction;
