// Submission Gateway - public entry point for new email jobs

use crate::application::lifecycle::LifecycleController;
use crate::application::queue::EnqueueError;
use crate::application::stats::Counters;
use crate::domain::{EmailJob, RejectReason, SubmitOutcome};
use std::sync::Arc;
use tracing::{info, warn};

/// Accepts or rejects jobs without ever blocking the caller
#[derive(Clone)]
pub struct SubmissionGateway {
    controller: Arc<LifecycleController>,
}

impl SubmissionGateway {
    pub fn new(controller: Arc<LifecycleController>) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &Arc<LifecycleController> {
        &self.controller
    }

    /// Reject early when shutdown has begun. Lets the request layer answer
    /// "shutting down" before it spends time validating a payload.
    pub fn check_accepting(&self) -> Result<(), RejectReason> {
        if self.controller.is_shutting_down() {
            Counters::incr(&self.controller.counters().rejected_shutdown);
            info!("Service is shutting down, rejecting email");
            return Err(RejectReason::ShuttingDown);
        }
        Ok(())
    }

    /// Submit a validated job.
    ///
    /// 1. Shutting down -> `Rejected(ShuttingDown)`, nothing is started.
    /// 2. Otherwise lazily start the pool.
    /// 3. Non-blocking enqueue: `Accepted` or `Rejected(QueueFull)`.
    pub fn submit(&self, job: EmailJob) -> SubmitOutcome {
        if let Err(reason) = self.check_accepting() {
            return SubmitOutcome::Rejected(reason);
        }

        let counters = self.controller.counters();
        let queue = self.controller.ensure_started();

        match queue.try_enqueue(job) {
            Ok(()) => {
                Counters::incr(&counters.accepted);
                info!("Email enqueued");
                SubmitOutcome::Accepted
            }
            Err(EnqueueError::Full(job)) => {
                Counters::incr(&counters.rejected_full);
                warn!(to = %job.to(), "Email queue is full, rejecting email");
                SubmitOutcome::Rejected(RejectReason::QueueFull)
            }
            // Shutdown closed the queue between the flag check and the send
            Err(EnqueueError::Closed(job)) => {
                Counters::incr(&counters.rejected_shutdown);
                info!(to = %job.to(), "Email queue closed, rejecting email");
                SubmitOutcome::Rejected(RejectReason::ShuttingDown)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PoolConfig;
    use crate::port::mailer::mocks::MockMailer;
    use std::time::Duration;
    use tokio::sync::Semaphore;

    fn gateway(config: PoolConfig, mailer: Arc<MockMailer>) -> SubmissionGateway {
        SubmissionGateway::new(Arc::new(LifecycleController::new(config, mailer)))
    }

    async fn wait_until(mut cond: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !cond() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn test_third_submit_rejected_when_capacity_two() {
        let gw = gateway(
            PoolConfig::new(2, 0).unwrap(),
            Arc::new(MockMailer::new_success()),
        );

        assert_eq!(gw.submit(EmailJob::new_test("a@example.com")), SubmitOutcome::Accepted);
        assert_eq!(gw.submit(EmailJob::new_test("b@example.com")), SubmitOutcome::Accepted);
        assert_eq!(
            gw.submit(EmailJob::new_test("c@example.com")),
            SubmitOutcome::Rejected(RejectReason::QueueFull)
        );

        let stats = gw.controller().stats();
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.rejected_full, 1);
        assert_eq!(stats.queued, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_capacity_never_exceeded_under_concurrency() {
        let gw = gateway(
            PoolConfig::new(5, 0).unwrap(),
            Arc::new(MockMailer::new_success()),
        );

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let gw = gw.clone();
                tokio::spawn(async move {
                    gw.submit(EmailJob::new_test(&format!("user{i}@example.com")))
                })
            })
            .collect();

        let mut accepted = 0;
        for h in handles {
            if h.await.unwrap().is_accepted() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 5);
        assert_eq!(gw.controller().stats().rejected_full, 45);
        assert_eq!(gw.controller().queue().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_submit_then_shutdown_then_submit() {
        let mailer = Arc::new(MockMailer::new_delayed(Duration::from_millis(50)));
        let gw = gateway(PoolConfig::default(), mailer.clone());

        assert_eq!(gw.submit(EmailJob::new_test("a@example.com")), SubmitOutcome::Accepted);

        gw.controller().shutdown().await;

        assert_eq!(
            gw.submit(EmailJob::new_test("b@example.com")),
            SubmitOutcome::Rejected(RejectReason::ShuttingDown)
        );

        let stats = gw.controller().stats();
        assert_eq!(stats.workers_running, 0);
        assert_eq!(
            stats.delivered + stats.abandoned,
            1,
            "first job must be delivered or explicitly abandoned"
        );
        assert_eq!(stats.rejected_shutdown, 1);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_does_not_start_pool() {
        let gw = gateway(PoolConfig::default(), Arc::new(MockMailer::new_success()));
        gw.controller().shutdown().await;

        for _ in 0..3 {
            assert_eq!(
                gw.submit(EmailJob::new_test("a@example.com")),
                SubmitOutcome::Rejected(RejectReason::ShuttingDown)
            );
        }
        assert!(!gw.controller().is_started());
        assert_eq!(gw.controller().stats().workers_spawned, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_accepted_jobs_are_all_delivered() {
        let mailer = Arc::new(MockMailer::new_success());
        let gw = gateway(PoolConfig::new(20, 3).unwrap(), mailer.clone());

        for i in 0..20 {
            assert!(gw
                .submit(EmailJob::new_test(&format!("user{i}@example.com")))
                .is_accepted());
        }

        let ctl = Arc::clone(gw.controller());
        wait_until(|| ctl.stats().delivered == 20).await;
        gw.controller().shutdown().await;

        assert_eq!(mailer.call_count(), 20);
        assert_eq!(gw.controller().stats().abandoned, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_blocked_workers_apply_backpressure() {
        let gate = Arc::new(Semaphore::new(0));
        let mailer = Arc::new(MockMailer::new_gated(Arc::clone(&gate)));
        let gw = gateway(PoolConfig::new(2, 1).unwrap(), mailer.clone());

        // Worker takes the first job and blocks in delivery
        assert!(gw.submit(EmailJob::new_test("first@example.com")).is_accepted());
        let ctl = Arc::clone(gw.controller());
        wait_until(|| ctl.queue().map_or(false, |q| q.is_empty())).await;

        assert!(gw.submit(EmailJob::new_test("b@example.com")).is_accepted());
        assert!(gw.submit(EmailJob::new_test("c@example.com")).is_accepted());
        assert_eq!(
            gw.submit(EmailJob::new_test("d@example.com")),
            SubmitOutcome::Rejected(RejectReason::QueueFull)
        );

        gate.add_permits(3);
        wait_until(|| ctl.stats().delivered == 3).await;
        gw.controller().shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_panicking_mailer_keeps_worker_alive() {
        let mailer = Arc::new(MockMailer::new_panic_inducing("boom"));
        let gw = gateway(PoolConfig::new(10, 1).unwrap(), mailer.clone());

        gw.submit(EmailJob::new_test("a@example.com"));
        gw.submit(EmailJob::new_test("b@example.com"));

        let ctl = Arc::clone(gw.controller());
        wait_until(|| ctl.stats().failed == 2).await;
        assert_eq!(ctl.stats().workers_running, 1);

        ctl.shutdown().await;
    }
}
