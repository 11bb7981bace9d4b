//! RPC Error Types
//!
//! Maps application errors and submission rejections to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use postbox_core::domain::RejectReason;
use postbox_core::error::AppError;
use serde_json::json;
use thiserror::Error;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SHUTTING_DOWN: i32 = 5030;
    pub const QUEUE_FULL: i32 = 5031;
}

/// Server lifecycle errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to build server on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register method {method}: {message}")]
    Register { method: &'static str, message: String },
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Domain(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

/// Convert a submission rejection to JSON-RPC ErrorObject
///
/// `data.reason` carries the machine-readable reason code.
pub fn reject_to_rpc_error(reason: RejectReason) -> ErrorObjectOwned {
    let (code, message) = match reason {
        RejectReason::ShuttingDown => (code::SHUTTING_DOWN, "Service is shutting down"),
        RejectReason::QueueFull => (
            code::QUEUE_FULL,
            "Service unavailable - email queue is full",
        ),
    };
    ErrorObjectOwned::owned(code, message, Some(json!({ "reason": reason.code() })))
}
