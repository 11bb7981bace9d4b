// Panic isolation for delivery calls
// A panicking Mailer must not take its worker down with it.

use crate::domain::EmailJob;
use crate::port::{DeliveryError, DeliveryReceipt, Mailer};
use std::any::Any;
use std::sync::Arc;
use tracing::error;

/// Result of a panic-guarded delivery
#[derive(Debug)]
pub enum GuardedDelivery {
    /// Mailer returned normally (success or error)
    Completed(Result<DeliveryReceipt, DeliveryError>),
    /// Mailer panicked
    Panicked(String),
    /// Delivery task was cancelled by runtime shutdown
    Cancelled,
}

/// Run one delivery in its own task so a panic is caught by the JoinHandle
pub async fn deliver_guarded(mailer: Arc<dyn Mailer>, job: EmailJob) -> GuardedDelivery {
    let handle = tokio::spawn(async move { mailer.deliver(&job).await });

    match handle.await {
        Ok(result) => GuardedDelivery::Completed(result),
        Err(join_err) if join_err.is_panic() => {
            let panic_msg = panic_message(join_err.into_panic());
            error!(panic_msg = %panic_msg, "Mailer panicked during delivery");
            GuardedDelivery::Panicked(panic_msg)
        }
        Err(_) => GuardedDelivery::Cancelled,
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::mailer::mocks::MockMailer;

    #[tokio::test]
    async fn test_panic_is_captured() {
        let mailer: Arc<dyn Mailer> = Arc::new(MockMailer::new_panic_inducing("smtp exploded"));
        let outcome = deliver_guarded(mailer, EmailJob::new_test("a@example.com")).await;

        match outcome {
            GuardedDelivery::Panicked(msg) => assert_eq!(msg, "smtp exploded"),
            other => panic!("expected panic outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_passes_through() {
        let mailer: Arc<dyn Mailer> = Arc::new(MockMailer::new_fail("relay down"));
        let outcome = deliver_guarded(mailer, EmailJob::new_test("a@example.com")).await;

        assert!(matches!(
            outcome,
            GuardedDelivery::Completed(Err(DeliveryError::Transport(ref m))) if m == "relay down"
        ));
    }
}
