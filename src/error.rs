use std::time::Duration;
use thiserror::Error;

/// Crate-level error type for configuration, startup and upstream plumbing
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (permanent failures)
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout error: operation timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    // Client errors (permanent - don't retry)
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Service temporarily unavailable: {service} - {reason}")]
    ServiceUnavailable { service: String, reason: String },

    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    #[error("Service error: {0}")]
    Service(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

impl Error {
    /// Shorthand for validation failures on a named field
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// Provider error conversion
impl From<crate::client::providers::ProviderError> for Error {
    fn from(err: crate::client::providers::ProviderError) -> Self {
        use crate::client::providers::ProviderError;

        match err {
            ProviderError::Network(msg) => Error::ServiceUnavailable {
                service: "provider".to_string(),
                reason: format!("Network error: {msg}"),
            },
            ProviderError::Http { status, message } => Error::ServiceUnavailable {
                service: "provider".to_string(),
                reason: format!("HTTP {status}: {message}"),
            },
            ProviderError::RateLimit => Error::ServiceUnavailable {
                service: "provider".to_string(),
                reason: "rate limit exceeded".to_string(),
            },
            ProviderError::ServiceUnavailable(msg) => Error::ServiceUnavailable {
                service: "provider".to_string(),
                reason: msg,
            },
            ProviderError::Timeout(timeout) => Error::Timeout { timeout },
            ProviderError::Parse(msg) => Error::Parse {
                context: "provider".to_string(),
                message: msg,
            },
            ProviderError::Other(msg) => Error::Provider(msg),
        }
    }
}
