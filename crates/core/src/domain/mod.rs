// Domain Layer - Pure business logic and entities

pub mod error;
pub mod job;
pub mod queue;
pub mod submission;

// Re-exports
pub use error::DomainError;
pub use job::{EmailJob, Recipient};
pub use queue::{PoolConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
pub use submission::{RejectReason, SubmitOutcome};
