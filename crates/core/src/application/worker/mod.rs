// Worker - Email delivery loop

pub mod constants;
mod panic_guard;
mod shutdown;

pub use panic_guard::{deliver_guarded, GuardedDelivery};
pub use shutdown::ShutdownFlag;

use crate::application::queue::QueueReceiver;
use crate::application::stats::Counters;
use crate::domain::EmailJob;
use crate::port::Mailer;
use std::sync::Arc;
use tracing::{error, info, warn};

/// One sequential consumer of the email queue. Holds no state across jobs.
pub struct EmailWorker {
    id: usize,
    queue: QueueReceiver<EmailJob>,
    shutdown: Arc<ShutdownFlag>,
    mailer: Arc<dyn Mailer>,
    counters: Arc<Counters>,
}

impl EmailWorker {
    pub(crate) fn new(
        id: usize,
        queue: QueueReceiver<EmailJob>,
        shutdown: Arc<ShutdownFlag>,
        mailer: Arc<dyn Mailer>,
        counters: Arc<Counters>,
    ) -> Self {
        Self {
            id,
            queue,
            shutdown,
            mailer,
            counters,
        }
    }

    /// Run until the queue is closed and drained, or until a received job
    /// finds the shutdown flag raised.
    pub async fn run(self) {
        info!(worker_id = self.id, "Email worker started");

        while let Some(job) = self.queue.recv().await {
            // Checkpoint: after dequeue, before delivery
            if self.shutdown.is_raised() {
                info!(
                    worker_id = self.id,
                    to = %job.to(),
                    "Shutdown in progress, skipping email"
                );
                Counters::incr(&self.counters.abandoned);
                break;
            }

            self.process(job).await;
        }

        info!(worker_id = self.id, "Email worker stopped");
    }

    async fn process(&self, job: EmailJob) {
        let to = job.to().clone();
        info!(
            worker_id = self.id,
            to = %to,
            subject = %job.subject(),
            "Sending email"
        );

        match deliver_guarded(Arc::clone(&self.mailer), job).await {
            GuardedDelivery::Completed(Ok(receipt)) => {
                Counters::incr(&self.counters.delivered);
                info!(
                    worker_id = self.id,
                    to = %to,
                    duration_ms = receipt.duration_ms,
                    "Email sent successfully"
                );
            }
            GuardedDelivery::Completed(Err(e)) => {
                Counters::incr(&self.counters.failed);
                error!(worker_id = self.id, to = %to, error = %e, "Email delivery failed");
            }
            GuardedDelivery::Panicked(msg) => {
                Counters::incr(&self.counters.failed);
                error!(worker_id = self.id, to = %to, panic_msg = %msg, "Email delivery panicked");
            }
            GuardedDelivery::Cancelled => {
                Counters::incr(&self.counters.failed);
                warn!(worker_id = self.id, to = %to, "Email delivery cancelled");
            }
        }
    }
}
