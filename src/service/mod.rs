//! Invocation engine services.
//!
//! # Data Flow
//! ```text
//! FanOutOrchestrator::invoke(targets, deadline, options)
//!     → clamp deadline, split per-call budget
//!     → per target: InvocationExecutor
//!         → auth via CredentialBroker
//!         → HTTP call via the transport port, raced by DeadlineCoordinator
//!         → failed attempts classified, retried per RetryPolicy
//!     → aggregate per ErrorStrategy → ordered responses or error
//! ```

mod credentials;
mod deadline;
mod executor;
mod fanout;
mod retry;

pub use credentials::CredentialBroker;
pub use deadline::{race_with_deadline, DeadlineElapsed};
pub use executor::InvocationExecutor;
pub use fanout::{FanOutOrchestrator, MAX_DEADLINE};
pub use retry::RetryPolicy;
