// Bounded Queue - fixed-capacity FIFO hand-off between producers and workers
// reason: async-channel gives an MPMC channel with non-blocking try_send and
// awaitable recv; closing keeps already-buffered items receivable.

use async_channel::{Receiver, Sender, TryRecvError, TrySendError};
use std::fmt;

/// Why an enqueue attempt failed; the rejected item is handed back
#[derive(Debug, PartialEq, Eq)]
pub enum EnqueueError<T> {
    /// Capacity already saturated
    Full(T),
    /// Queue was closed by the shutdown sequence
    Closed(T),
}

impl<T> fmt::Display for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnqueueError::Full(_) => write!(f, "queue is full"),
            EnqueueError::Closed(_) => write!(f, "queue is closed"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for EnqueueError<T> {}

/// Fixed-capacity multi-producer, multi-consumer FIFO
pub struct BoundedQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// # Panics
    /// If `capacity` is zero. `PoolConfig` never produces one.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be at least 1");
        let (tx, rx) = async_channel::bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Non-blocking enqueue: succeeds or fails immediately
    pub fn try_enqueue(&self, item: T) -> Result<(), EnqueueError<T>> {
        self.tx.try_send(item).map_err(|e| match e {
            TrySendError::Full(item) => EnqueueError::Full(item),
            TrySendError::Closed(item) => EnqueueError::Closed(item),
        })
    }

    /// Handle for a consumer
    pub fn receiver(&self) -> QueueReceiver<T> {
        QueueReceiver {
            rx: self.rx.clone(),
        }
    }

    /// Take one buffered item without waiting
    pub fn try_dequeue(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(item) => Some(item),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    /// Stop accepting items. Buffered items stay receivable.
    ///
    /// Returns `true` only for the call that actually closed the queue.
    pub fn close(&self) -> bool {
        self.tx.close()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Items enqueued but not yet dequeued
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Consumer side of a `BoundedQueue`
pub struct QueueReceiver<T> {
    rx: Receiver<T>,
}

impl<T> QueueReceiver<T> {
    /// Wait for the next item; `None` once the queue is closed and drained
    pub async fn recv(&self) -> Option<T> {
        self.rx.recv().await.ok()
    }
}

impl<T> Clone for QueueReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}
