// Worker constants (No magic values)
use std::time::Duration;

/// Simulated time to hand one message to the delivery sink (1s)
pub const DEFAULT_SEND_DELAY: Duration = Duration::from_secs(1);

/// Deadline for the whole process shutdown sequence (30s)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Worker ids are 1-based in logs
pub const FIRST_WORKER_ID: usize = 1;
