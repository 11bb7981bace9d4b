//! RPC Method Handlers
//!
//! Implements the request-side logic for each JSON-RPC method.

use crate::error::{reject_to_rpc_error, to_rpc_error};
use crate::types::{SendEmailRequest, SendEmailResponse, StatsRequest, StatsResponse};
use jsonrpsee::types::ErrorObjectOwned;
use postbox_core::application::SubmissionGateway;
use postbox_core::domain::{EmailJob, Recipient, SubmitOutcome};
use postbox_core::error::AppError;
use tracing::debug;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    gateway: SubmissionGateway,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(gateway: SubmissionGateway) -> Self {
        Self {
            gateway,
            start_time: std::time::Instant::now(),
        }
    }

    /// email.send.v1
    pub async fn send_email(
        &self,
        params: SendEmailRequest,
    ) -> Result<SendEmailResponse, ErrorObjectOwned> {
        // Shutdown wins over validation errors
        self.gateway
            .check_accepting()
            .map_err(reject_to_rpc_error)?;

        // Pool starts on the first accepted-for-processing request, valid or not
        self.gateway.controller().ensure_started();

        let job = build_job(params).map_err(to_rpc_error)?;
        let to = job.to().to_string();

        match self.gateway.submit(job) {
            SubmitOutcome::Accepted => Ok(SendEmailResponse {
                status: "enqueued".to_string(),
                to,
            }),
            SubmitOutcome::Rejected(reason) => Err(reject_to_rpc_error(reason)),
        }
    }

    /// admin.stats.v1
    pub async fn stats(&self, _params: StatsRequest) -> Result<StatsResponse, ErrorObjectOwned> {
        Ok(StatsResponse {
            queue: self.gateway.controller().stats(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }
}

/// Validate the raw request into a job
fn build_job(params: SendEmailRequest) -> Result<EmailJob, AppError> {
    let to = Recipient::parse(&params.to)?;
    let job = EmailJob::new(to, params.subject, params.body)?;
    debug!(to = %job.to(), "Email request validated");
    Ok(job)
}
