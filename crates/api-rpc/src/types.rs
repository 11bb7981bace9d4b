//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use postbox_core::application::QueueStats;
use serde::{Deserialize, Serialize};

/// email.send.v1 - Queue an email for asynchronous delivery
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendEmailResponse {
    pub status: String,
    pub to: String,
}

/// admin.stats.v1 - Queue and worker statistics
#[derive(Debug, Default, Deserialize)]
pub struct StatsRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub queue: QueueStats,
    pub uptime_seconds: u64,
}
