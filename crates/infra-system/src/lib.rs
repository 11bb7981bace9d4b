// Postbox Infrastructure - System Adapters
// Implements: Mailer

pub mod simulated_mailer;

pub use simulated_mailer::SimulatedMailer;
