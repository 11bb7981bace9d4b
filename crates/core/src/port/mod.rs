// Port Layer - Interfaces for external dependencies

pub mod mailer;
pub mod time_provider;

// Re-exports
pub use mailer::{DeliveryError, DeliveryReceipt, Mailer};
pub use time_provider::TimeProvider;
