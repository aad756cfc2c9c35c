//! Error types for vembed core

use crate::types::ResourceKind;
use thiserror::Error;

/// Result type alias for loader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Loader error types
#[derive(Error, Debug)]
pub enum Error {
    // Resource errors
    #[error("Failed to load {kind}: {url}")]
    LoadFailure { kind: ResourceKind, url: String },

    // Readiness errors
    #[error("Timeout waiting for global: {symbol}")]
    Timeout { symbol: String },

    #[error("Not in browser environment")]
    Environment,

    // URL errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl Error {
    /// Create a load failure for the given resource
    pub fn load_failure(kind: ResourceKind, url: impl Into<String>) -> Self {
        Error::LoadFailure {
            kind,
            url: url.into(),
        }
    }

    /// Returns true if retrying the same call could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::LoadFailure { .. } | Error::Timeout { .. })
    }

    /// Returns the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::LoadFailure { .. } => "LOAD_FAILURE",
            Error::Timeout { .. } => "TIMEOUT",
            Error::Environment => "ENVIRONMENT",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::ConfigParse(_) => "CONFIG_PARSE",
        }
    }
}
