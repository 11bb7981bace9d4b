// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),

    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
