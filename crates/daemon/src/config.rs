//! Daemon configuration, read once from the environment at startup

use postbox_core::application::worker::constants::{DEFAULT_SEND_DELAY, DEFAULT_SHUTDOWN_TIMEOUT};
use postbox_core::domain::{PoolConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
use postbox_core::error::{AppError, Result};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_RPC_HOST: &str = "0.0.0.0";
const DEFAULT_RPC_PORT: u16 = 3000;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub rpc_host: String,
    pub rpc_port: u16,
    pub pool: PoolConfig,
    pub send_delay: Duration,
    pub shutdown_timeout: Duration,
    pub log_format: LogFormat,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map instead of the process env)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rpc_host = lookup("POSTBOX_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string());

        let rpc_port = match lookup("POSTBOX_RPC_PORT") {
            Some(raw) => parse_value("POSTBOX_RPC_PORT", &raw)?,
            None => parse_or("PORT", lookup("PORT"), DEFAULT_RPC_PORT)?,
        };

        let capacity = parse_or(
            "POSTBOX_QUEUE_CAPACITY",
            lookup("POSTBOX_QUEUE_CAPACITY"),
            DEFAULT_QUEUE_CAPACITY,
        )?;
        let workers = parse_or("POSTBOX_WORKERS", lookup("POSTBOX_WORKERS"), DEFAULT_WORKERS)?;
        if workers == 0 {
            return Err(AppError::Config(
                "POSTBOX_WORKERS must be at least 1".to_string(),
            ));
        }
        let pool = PoolConfig::new(capacity, workers).map_err(|e| AppError::Config(e.to_string()))?;

        let send_delay = Duration::from_millis(parse_or(
            "POSTBOX_SEND_DELAY_MS",
            lookup("POSTBOX_SEND_DELAY_MS"),
            DEFAULT_SEND_DELAY.as_millis() as u64,
        )?);

        let shutdown_timeout = Duration::from_secs(parse_or(
            "POSTBOX_SHUTDOWN_TIMEOUT_SECS",
            lookup("POSTBOX_SHUTDOWN_TIMEOUT_SECS"),
            DEFAULT_SHUTDOWN_TIMEOUT.as_secs(),
        )?);

        let log_format = match lookup("POSTBOX_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "POSTBOX_LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            rpc_host,
            rpc_port,
            pool,
            send_delay,
            shutdown_timeout,
            log_format,
        })
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} has invalid value '{}'", key, raw)))
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}
