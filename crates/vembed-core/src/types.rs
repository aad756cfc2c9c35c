//! Core types for vembed

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default interval between global readiness checks
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default deadline for a global to appear
pub const DEFAULT_GLOBAL_TIMEOUT_MS: u64 = 10_000;

/// Kind of external resource injected into the document head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Script,
    Stylesheet,
}

impl ResourceKind {
    /// Tag name of the element that carries this resource
    pub fn tag_name(&self) -> &'static str {
        match self {
            ResourceKind::Script => "script",
            ResourceKind::Stylesheet => "link",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Script => write!(f, "script"),
            ResourceKind::Stylesheet => write!(f, "stylesheet"),
        }
    }
}

/// Execution context the loader runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// A document and global namespace are available
    #[default]
    Browser,
    /// Server-side rendering or any other context without a document
    Server,
}

impl Environment {
    pub fn is_browser(&self) -> bool {
        matches!(self, Environment::Browser)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Browser => write!(f, "browser"),
            Environment::Server => write!(f, "server"),
        }
    }
}

/// A single request to inject a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    /// Resource URL, passed through unvalidated
    pub url: String,
    /// Identifier used for the idempotency check
    pub id: Option<String>,
    /// Script or stylesheet
    pub kind: ResourceKind,
}

impl LoadRequest {
    pub fn script(url: impl Into<String>, id: Option<&str>) -> Self {
        Self {
            url: url.into(),
            id: id.map(str::to_string),
            kind: ResourceKind::Script,
        }
    }

    pub fn stylesheet(href: impl Into<String>, id: Option<&str>) -> Self {
        Self {
            url: href.into(),
            id: id.map(str::to_string),
            kind: ResourceKind::Stylesheet,
        }
    }
}

/// A request to wait for a named global
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollRequest {
    pub symbol: String,
    pub timeout: Duration,
}

impl PollRequest {
    pub fn new(symbol: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            symbol: symbol.into(),
            timeout: timeout.unwrap_or(Duration::from_millis(DEFAULT_GLOBAL_TIMEOUT_MS)),
        }
    }
}

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Execution context; `Server` turns loads into no-ops
    pub environment: Environment,
    /// Interval between global readiness checks (milliseconds)
    pub poll_interval_ms: u64,
    /// Default deadline for `wait_for_global` (milliseconds)
    pub global_timeout_ms: u64,
    /// Share one append between concurrent loads of the same identifier
    pub dedupe_in_flight: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Browser,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            global_timeout_ms: DEFAULT_GLOBAL_TIMEOUT_MS,
            dedupe_in_flight: true,
        }
    }
}

impl LoaderConfig {
    /// Config for contexts without a document
    pub fn server() -> Self {
        Self {
            environment: Environment::Server,
            ..Default::default()
        }
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn global_timeout(&self) -> Duration {
        Duration::from_millis(self.global_timeout_ms)
    }
}
