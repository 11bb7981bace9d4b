// Email Job Domain Model

use super::error::{DomainError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Address shape accepted by the request layer: one `@`, no whitespace,
/// and a dotted domain part.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is a valid regex")
});

/// Validated recipient address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Recipient(String);

impl Recipient {
    /// Parse an email-shaped address
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyField("to"));
        }
        if !EMAIL_PATTERN.is_match(trimmed) {
            return Err(DomainError::InvalidRecipient(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Recipient {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Recipient> for String {
    fn from(value: Recipient) -> Self {
        value.0
    }
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One unit of asynchronous work: a message to be delivered.
///
/// Immutable once built. There is no identity field, so two jobs with the
/// same recipient, subject and body are indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    to: Recipient,
    subject: String,
    body: String,
}

impl EmailJob {
    /// Build a job, rejecting an empty subject or body.
    ///
    /// Presence check only: whitespace-only text is kept as given.
    pub fn new(to: Recipient, subject: impl Into<String>, body: impl Into<String>) -> Result<Self> {
        let subject = subject.into();
        let body = body.into();
        if subject.is_empty() {
            return Err(DomainError::EmptyField("subject"));
        }
        if body.is_empty() {
            return Err(DomainError::EmptyField("body"));
        }
        Ok(Self { to, subject, body })
    }

    /// Create a job with fixed valid content (for tests only)
    pub fn new_test(to: &str) -> Self {
        Self {
            to: Recipient(to.to_string()),
            subject: "Test subject".to_string(),
            body: "Test body".to_string(),
        }
    }

    pub fn to(&self) -> &Recipient {
        &self.to
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}
