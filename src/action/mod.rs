//! The Action contract and its building blocks.
//!
//! - [`Action`]: the trait every unit of work implements
//! - [`Call`] and [`Closure`]: the generic call-a-function action
//! - [`ActionExt`]: combinators (`map`, `and_then`, `with_reaction`, ...)
//! - [`BoxedAction`]: type erasure for heterogeneous batches

mod boxed;
mod call;
mod closure;
pub mod combinators;
mod ext;
mod trait_def;

pub use boxed::BoxedAction;
pub use call::Call;
pub use closure::Closure;
pub use combinators::{AndThen, Map, MapErr, Named, Synchronized, WithReaction};
pub use ext::ActionExt;
pub use trait_def::Action;

#[cfg(test)]
mod tests;
