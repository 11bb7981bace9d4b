//! Postbox - Main Entry Point
//! JSON-RPC front end + bounded email queue + worker pool

mod config;
mod signals;

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{DaemonConfig, LogFormat};
use postbox_api_rpc::{RpcServer, RpcServerConfig};
use postbox_core::application::{LifecycleController, SubmissionGateway};
use postbox_core::port::time_provider::SystemTimeProvider;
use postbox_infra_system::SimulatedMailer;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env()?;

    // 2. Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("postbox=info"))?;

    match config.log_format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Postbox v{} starting...", postbox_core::VERSION);

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let mailer = Arc::new(SimulatedMailer::new(time_provider, config.send_delay));
    let controller = Arc::new(LifecycleController::new(config.pool, mailer));
    let gateway = SubmissionGateway::new(Arc::clone(&controller));

    // 4. Start JSON-RPC server (queue and workers start on first request)
    let rpc_config = RpcServerConfig {
        host: config.rpc_host.clone(),
        port: config.rpc_port,
    };
    let (addr, rpc_handle) = RpcServer::new(rpc_config, gateway).start().await?;

    info!(
        addr = %addr,
        queue_capacity = config.pool.queue_capacity(),
        workers = config.pool.workers(),
        "System ready. Waiting for emails..."
    );

    // 5. Wait for shutdown signal
    signals::wait_for_termination().await?;

    info!("Shutting down server...");

    // 6. Graceful shutdown: drain the queue, then close the listener
    let shutdown = async {
        controller.shutdown().await;
        if rpc_handle.stop().is_ok() {
            rpc_handle.clone().stopped().await;
        }
    };

    if tokio::time::timeout(config.shutdown_timeout, shutdown).await.is_err() {
        warn!(
            timeout_secs = config.shutdown_timeout.as_secs(),
            "Shutdown deadline exceeded, forcing exit"
        );
    }

    info!("Server exited");

    Ok(())
}
