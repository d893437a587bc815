use std::path::PathBuf;

use thiserror::Error;

/// Main library error type covering every failure a caller can observe.
///
/// Network failures while talking to the checker are not represented here:
/// they are folded into a [`ValidatorResults`](crate::ValidatorResults) with a
/// `network-error` message instead.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {path} - {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Concurrent operation error: {details}")]
    Concurrency { details: String },
}

/// Configuration-specific error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Invalid configuration value: {field} = {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

/// Failures of the HTTP transport. These never escape
/// [`Validator::validate`](crate::Validator::validate); the normalizer turns
/// them into a `network-error` message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The checker answered, but with a non-success status.
    #[error("{status} {status_text} {url}")]
    Status {
        status: u16,
        status_text: String,
        url: String,
    },

    /// No HTTP response was received (connection refused, DNS, timeout, ...).
    #[error("{code} {message}")]
    Connection { code: String, message: String },
}

impl TransportError {
    /// Status code of the failed exchange, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Connection { .. } => None,
        }
    }
}

impl From<ConfigError> for ValidatorError {
    fn from(err: ConfigError) -> Self {
        ValidatorError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
