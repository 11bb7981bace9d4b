// Simulated mailer implementation
// reason: stands in for a real relay; logs the message and sleeps for the send delay
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use postbox_core::application::worker::constants::DEFAULT_SEND_DELAY;
use postbox_core::domain::EmailJob;
use postbox_core::port::mailer::{DeliveryError, DeliveryReceipt, Mailer};
use postbox_core::port::TimeProvider;

/// Mailer that pretends to send: logs the message, waits `send_delay`, succeeds
pub struct SimulatedMailer {
    time_provider: Arc<dyn TimeProvider>,
    send_delay: Duration,
}

impl SimulatedMailer {
    /// Create a new simulated mailer
    ///
    /// # Example
    /// ```ignore
    /// let mailer = SimulatedMailer::new(
    ///     Arc::new(SystemTimeProvider),
    ///     Duration::from_secs(1),
    /// );
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>, send_delay: Duration) -> Self {
        Self {
            time_provider,
            send_delay,
        }
    }

    /// Simulated mailer with the default one second send delay
    pub fn with_default_delay(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self::new(time_provider, DEFAULT_SEND_DELAY)
    }

    pub fn send_delay(&self) -> Duration {
        self.send_delay
    }
}

#[async_trait]
impl Mailer for SimulatedMailer {
    async fn deliver(&self, job: &EmailJob) -> Result<DeliveryReceipt, DeliveryError> {
        let start_time = self.time_provider.now_millis();

        info!(
            to = %job.to(),
            subject = %job.subject(),
            "Simulating email send"
        );
        debug!(to = %job.to(), body = %job.body(), "Email body");

        if !self.send_delay.is_zero() {
            tokio::time::sleep(self.send_delay).await;
        }

        let duration_ms = self.time_provider.now_millis() - start_time;
        Ok(DeliveryReceipt { duration_ms })
    }
}
