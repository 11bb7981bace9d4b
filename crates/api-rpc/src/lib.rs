//! JSON-RPC API Layer
//!
//! Request interface for Postbox: validates incoming email requests and
//! hands them to the submission gateway.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
