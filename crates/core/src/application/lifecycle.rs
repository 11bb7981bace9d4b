// Lifecycle Controller - one-time pool start and one-time coordinated shutdown

use crate::application::queue::BoundedQueue;
use crate::application::stats::{Counters, QueueStats};
use crate::application::worker::constants::FIRST_WORKER_ID;
use crate::application::worker::{EmailWorker, ShutdownFlag};
use crate::domain::{EmailJob, PoolConfig};
use crate::port::Mailer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::runtime::Handle;
use tokio::sync::OnceCell;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

/// Owns the email queue, its worker pool and the shutdown state.
///
/// The queue and workers are created lazily by the first
/// [`ensure_started`](Self::ensure_started) call. [`shutdown`](Self::shutdown)
/// raises the flag, closes the queue and waits for every worker to exit;
/// its body runs once no matter how many callers race on it.
pub struct LifecycleController {
    config: PoolConfig,
    mailer: Arc<dyn Mailer>,
    runtime: Handle,
    queue: OnceLock<BoundedQueue<EmailJob>>,
    shutdown_flag: Arc<ShutdownFlag>,
    shutdown_done: OnceCell<()>,
    shutdown_runs: AtomicUsize,
    workers: TaskTracker,
    counters: Arc<Counters>,
}

impl LifecycleController {
    /// Create a controller whose workers run on the current tokio runtime
    ///
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn new(config: PoolConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self::with_runtime(config, mailer, Handle::current())
    }

    pub fn with_runtime(config: PoolConfig, mailer: Arc<dyn Mailer>, runtime: Handle) -> Self {
        Self {
            config,
            mailer,
            runtime,
            queue: OnceLock::new(),
            shutdown_flag: Arc::new(ShutdownFlag::new()),
            shutdown_done: OnceCell::new(),
            shutdown_runs: AtomicUsize::new(0),
            workers: TaskTracker::new(),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Create the queue and launch the workers, exactly once.
    ///
    /// Concurrent callers block until the first one has finished, then all
    /// observe the same queue.
    pub fn ensure_started(&self) -> &BoundedQueue<EmailJob> {
        if let Some(queue) = self.queue.get() {
            return queue;
        }

        // Held across the store so a shutdown either sees the stored queue
        // or is seen by the initializer.
        let shutting_down = self.shutdown_flag.read();
        let queue = self
            .queue
            .get_or_init(|| self.start_pool(*shutting_down));
        drop(shutting_down);
        queue
    }

    fn start_pool(&self, shutting_down: bool) -> BoundedQueue<EmailJob> {
        let queue = BoundedQueue::new(self.config.queue_capacity());

        if shutting_down {
            // Lost the race against shutdown: nothing may be accepted
            queue.close();
            warn!("Email queue initialized after shutdown began; no workers started");
            return queue;
        }

        for offset in 0..self.config.workers() {
            let worker = EmailWorker::new(
                FIRST_WORKER_ID + offset,
                queue.receiver(),
                Arc::clone(&self.shutdown_flag),
                Arc::clone(&self.mailer),
                Arc::clone(&self.counters),
            );
            self.workers.spawn_on(worker.run(), &self.runtime);
            Counters::incr(&self.counters.workers_spawned);
        }

        info!(
            capacity = self.config.queue_capacity(),
            workers = self.config.workers(),
            "Email queue initialized"
        );
        queue
    }

    /// Concurrency-safe read of the shutdown flag
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_flag.is_raised()
    }

    pub fn is_started(&self) -> bool {
        self.queue.get().is_some()
    }

    /// Queue, if the pool has been started
    pub fn queue(&self) -> Option<&BoundedQueue<EmailJob>> {
        self.queue.get()
    }

    /// Raise the flag, close the queue, wait for all workers to exit.
    ///
    /// Runs once. Later or concurrent callers wait for that run to finish.
    /// There is no internal timeout; callers that need one wrap this future.
    ///
    /// Drive the returned future to completion. Dropping it part-way (for
    /// example via an elapsed `tokio::time::timeout`) leaves the completion
    /// guard unset, so the next caller runs the whole sequence again. Every
    /// step is idempotent, but `is_shutdown_complete` stays `false` until
    /// some call finishes.
    pub async fn shutdown(&self) {
        self.shutdown_done
            .get_or_init(|| self.run_shutdown())
            .await;
    }

    async fn run_shutdown(&self) {
        self.shutdown_runs.fetch_add(1, Ordering::SeqCst);
        info!("Starting graceful shutdown of email queue...");

        self.shutdown_flag.raise();

        if let Some(queue) = self.queue.get() {
            if queue.close() {
                info!("Email queue closed");
            }
        }

        info!("Waiting for all email workers to finish...");
        self.workers.close();
        self.workers.wait().await;

        // Jobs still buffered when the workers stopped are dropped here
        if let Some(queue) = self.queue.get() {
            let mut discarded = 0u64;
            while queue.try_dequeue().is_some() {
                discarded += 1;
            }
            if discarded > 0 {
                warn!(discarded, "Discarded queued emails left after shutdown");
                Counters::add(&self.counters.abandoned, discarded);
            }
        }

        info!("All email workers have stopped. Email queue shutdown complete.");
    }

    /// Whether the shutdown sequence has completed
    pub fn is_shutdown_complete(&self) -> bool {
        self.shutdown_done.initialized()
    }

    pub fn stats(&self) -> QueueStats {
        let c = &self.counters;
        let queued = self.queue.get().map_or(0, |q| q.len());
        QueueStats {
            accepted: Counters::get(&c.accepted),
            rejected_full: Counters::get(&c.rejected_full),
            rejected_shutdown: Counters::get(&c.rejected_shutdown),
            delivered: Counters::get(&c.delivered),
            failed: Counters::get(&c.failed),
            abandoned: Counters::get(&c.abandoned),
            queued: queued as u64,
            queue_capacity: self.config.queue_capacity() as u64,
            workers_spawned: Counters::get(&c.workers_spawned),
            workers_running: self.workers.len() as u64,
            started: self.is_started(),
            shutting_down: self.is_shutting_down(),
        }
    }

    pub(crate) fn counters(&self) -> &Counters {
        &self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::mailer::mocks::MockMailer;
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn controller(capacity: usize, workers: usize, mailer: Arc<MockMailer>) -> Arc<LifecycleController> {
        Arc::new(LifecycleController::new(
            PoolConfig::new(capacity, workers).unwrap(),
            mailer,
        ))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_start_creates_one_pool() {
        let ctl = controller(10, 3, Arc::new(MockMailer::new_success()));
        let barrier = Arc::new(Barrier::new(32));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let ctl = Arc::clone(&ctl);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    ctl.ensure_started() as *const BoundedQueue<EmailJob> as usize
                })
            })
            .collect();

        let mut addrs = Vec::new();
        for h in handles {
            addrs.push(h.await.unwrap());
        }
        addrs.dedup();

        assert_eq!(addrs.len(), 1, "every caller must see the same queue");
        assert_eq!(ctl.stats().workers_spawned, 3);

        ctl.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_shutdown_runs_once() {
        let mailer = Arc::new(MockMailer::new_delayed(Duration::from_millis(100)));
        let ctl = controller(10, 2, mailer.clone());
        ctl.ensure_started()
            .try_enqueue(EmailJob::new_test("a@example.com"))
            .unwrap();

        // Let a worker pick the job up so shutdown has something to wait for
        tokio::time::sleep(Duration::from_millis(20)).await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctl = Arc::clone(&ctl);
                tokio::spawn(async move {
                    ctl.shutdown().await;
                    ctl.stats().workers_running
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.await.unwrap(), 0, "caller returned before workers drained");
        }

        assert_eq!(ctl.shutdown_runs.load(Ordering::SeqCst), 1);
        assert!(ctl.is_shutdown_complete());
        let stats = ctl.stats();
        assert_eq!(stats.delivered + stats.abandoned, 1);
        assert_eq!(mailer.call_count() as u64, stats.delivered);
        assert!(ctl.queue().unwrap().is_closed());

        ctl.shutdown().await;
        assert_eq!(ctl.shutdown_runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_shutdown_is_rerun_by_next_caller() {
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        let mailer = Arc::new(MockMailer::new_gated(Arc::clone(&gate)));
        let ctl = controller(10, 1, mailer.clone());
        ctl.ensure_started()
            .try_enqueue(EmailJob::new_test("a@example.com"))
            .unwrap();

        // Worker is now parked on the gate inside the delivery
        tokio::time::sleep(Duration::from_millis(20)).await;

        let first = tokio::time::timeout(Duration::from_millis(50), ctl.shutdown()).await;
        assert!(first.is_err(), "shutdown must still be waiting on the worker");
        assert!(ctl.is_shutting_down());
        assert!(!ctl.is_shutdown_complete());

        gate.add_permits(1);
        ctl.shutdown().await;

        assert_eq!(ctl.shutdown_runs.load(Ordering::SeqCst), 2);
        assert!(ctl.is_shutdown_complete());
        let stats = ctl.stats();
        assert_eq!(stats.workers_running, 0);
        assert_eq!(stats.delivered + stats.abandoned, 1);
        assert_eq!(mailer.call_count() as u64, stats.delivered);
    }

    #[tokio::test]
    async fn test_shutdown_without_start() {
        let ctl = controller(10, 3, Arc::new(MockMailer::new_success()));
        ctl.shutdown().await;

        assert!(ctl.is_shutting_down());
        assert!(!ctl.is_started());
        assert_eq!(ctl.stats().workers_spawned, 0);
    }

    #[tokio::test]
    async fn test_start_after_shutdown_yields_closed_queue() {
        let ctl = controller(10, 3, Arc::new(MockMailer::new_success()));
        ctl.shutdown().await;

        let queue = ctl.ensure_started();
        assert!(queue.is_closed());
        assert_eq!(ctl.stats().workers_spawned, 0);
    }

    #[tokio::test]
    async fn test_buffered_jobs_without_workers_are_counted_abandoned() {
        let ctl = controller(4, 0, Arc::new(MockMailer::new_success()));
        let queue = ctl.ensure_started();
        queue.try_enqueue(EmailJob::new_test("a@example.com")).unwrap();
        queue.try_enqueue(EmailJob::new_test("b@example.com")).unwrap();

        ctl.shutdown().await;

        let stats = ctl.stats();
        assert_eq!(stats.abandoned, 2);
        assert_eq!(stats.queued, 0);
    }
}
