//! Transport-agnostic domain types: targets, options, responses, tokens.
//!
//! Everything in this module is plain data. Orchestration lives in
//! [`service`](crate::service); I/O lives behind the [`port`](crate::port)
//! traits.

mod options;
mod response;
mod target;
mod token;

pub use options::{ErrorStrategy, InvocationOptions};
pub use response::{InvocationFault, InvocationResponse};
pub use target::{FunctionId, InvocationTarget, RetryPredicate};
pub use token::AccessToken;
