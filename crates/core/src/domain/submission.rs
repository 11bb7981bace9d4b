// Submission Outcome Domain Model

use serde::{Deserialize, Serialize};

/// Why a submission was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    /// Shutdown has begun; no new work is accepted
    ShuttingDown,
    /// Queue capacity is exhausted (backpressure)
    QueueFull,
}

impl RejectReason {
    /// Machine-distinguishable reason code
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::ShuttingDown => "shutting-down",
            RejectReason::QueueFull => "queue-full",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::ShuttingDown => write!(f, "service shutting down"),
            RejectReason::QueueFull => write!(f, "queue full"),
        }
    }
}

/// Immediate result of a submission; decided synchronously
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }
}
