// Application Layer - Queue, Workers, Lifecycle and Submission

pub mod gateway;
pub mod lifecycle;
pub mod queue;
pub mod stats;
pub mod worker;

// Re-exports
pub use gateway::SubmissionGateway;
pub use lifecycle::LifecycleController;
pub use queue::{BoundedQueue, EnqueueError, QueueReceiver};
pub use stats::QueueStats;
pub use worker::{EmailWorker, ShutdownFlag};
