// Queue & Pool Configuration Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Default bounded queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Default number of workers
pub const DEFAULT_WORKERS: usize = 3;

/// Queue capacity and worker count, fixed for the lifetime of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    queue_capacity: usize,
    workers: usize,
}

impl PoolConfig {
    /// `workers == 0` is allowed: nothing ever drains the queue, which is
    /// only useful for exercising backpressure.
    pub fn new(queue_capacity: usize, workers: usize) -> Result<Self> {
        if queue_capacity == 0 {
            return Err(DomainError::InvalidConfig(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            queue_capacity,
            workers,
        })
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            workers: DEFAULT_WORKERS,
        }
    }
}
