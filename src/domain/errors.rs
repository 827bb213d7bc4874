//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The provider answered, but with an error status or error payload.
    #[error("{provider} API error: {message}")]
    Api { provider: String, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn api(provider: &str, message: impl Into<String>) -> Self {
        DomainError::Api {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
