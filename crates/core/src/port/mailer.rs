// Mailer Port
// Abstraction for the external delivery sink (SMTP relay, provider API, ...)

use crate::domain::EmailJob;
use async_trait::async_trait;
use thiserror::Error;

/// Result of a successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub duration_ms: i64,
}

/// Delivery errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Recipient rejected: {0}")]
    Rejected(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Delivery timed out after {0}ms")]
    Timeout(i64),
}

/// Mailer trait
///
/// Called once per dequeued job that a worker commits to. Fire-and-forget:
/// errors are logged by the caller, never retried and never reported back
/// to the submitter.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, job: &EmailJob) -> Result<DeliveryReceipt, DeliveryError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Semaphore;

    /// Mock mailer behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed
        Success,
        /// Always fail with message
        Fail(String),
        /// Panic with message (for panic isolation testing)
        Panic(String),
        /// Sleep before succeeding
        Delay(Duration),
    }

    /// Mock Mailer recording every delivered job
    pub struct MockMailer {
        behavior: Arc<Mutex<MockBehavior>>,
        delivered: Arc<Mutex<Vec<EmailJob>>>,
        gate: Option<Arc<Semaphore>>,
    }

    impl MockMailer {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                delivered: Arc::new(Mutex::new(Vec::new())),
                gate: None,
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        pub fn new_panic_inducing(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Panic(message.into()))
        }

        pub fn new_delayed(delay: Duration) -> Self {
            Self::new(MockBehavior::Delay(delay))
        }

        /// Every delivery first waits for a permit on `gate`
        pub fn new_gated(gate: Arc<Semaphore>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new_success()
            }
        }

        pub fn call_count(&self) -> usize {
            self.delivered.lock().unwrap().len()
        }

        pub fn delivered(&self) -> Vec<EmailJob> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for MockMailer {
        async fn deliver(&self, job: &EmailJob) -> Result<DeliveryReceipt, DeliveryError> {
            if let Some(gate) = &self.gate {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
            }

            self.delivered.lock().unwrap().push(job.clone());

            let behavior = self.behavior.lock().unwrap().clone();
            match behavior {
                MockBehavior::Success => Ok(DeliveryReceipt { duration_ms: 0 }),
                MockBehavior::Fail(msg) => Err(DeliveryError::Transport(msg)),
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
                MockBehavior::Delay(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(DeliveryReceipt {
                        duration_ms: delay.as_millis() as i64,
                    })
                }
            }
        }
    }
}
