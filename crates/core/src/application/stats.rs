// Queue Statistics

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of the queue and its workers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub accepted: u64,
    pub rejected_full: u64,
    pub rejected_shutdown: u64,
    pub delivered: u64,
    pub failed: u64,
    pub abandoned: u64,
    pub queued: u64,
    pub queue_capacity: u64,
    pub workers_spawned: u64,
    pub workers_running: u64,
    pub started: bool,
    pub shutting_down: bool,
}

/// Lock-free counters shared by the gateway, the workers and the controller
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub accepted: AtomicU64,
    pub rejected_full: AtomicU64,
    pub rejected_shutdown: AtomicU64,
    pub delivered: AtomicU64,
    pub failed: AtomicU64,
    pub abandoned: AtomicU64,
    pub workers_spawned: AtomicU64,
}

impl Counters {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}
