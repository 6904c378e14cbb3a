//! Core error types for hnpulse-core.
//!
//! Only fetch failures ever abort a tick. Persistence read errors never surface
//! (they recover to defaults) and write errors are logged by the session, so
//! most of this hierarchy exists for the CLI and for config validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hnpulse-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Story fetch failed after retries
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the Hacker News client.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    /// Transport-level failure (DNS, TLS, connection reset, timeout)
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Body was not the JSON shape we expected
    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Invalid endpoint URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Every attempt failed
    #[error("Giving up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key is not part of the config record
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

impl FetchError {
    /// URL the failing request was sent to, when known.
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::Http { url, .. }
            | FetchError::Request { url, .. }
            | FetchError::Decode { url, .. }
            | FetchError::Exhausted { url, .. } => Some(url),
            FetchError::Url(_) => None,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
