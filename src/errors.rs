//! Error types for the availability checker

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckerError>;

/// Failures outside of probing itself.
///
/// An unreachable site is never an error: it is recorded as an unavailable
/// [`ProbeOutcome`](crate::model::ProbeOutcome).
#[derive(Debug, Error)]
pub enum CheckerError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration document could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configuration source could not be read or fetched
    #[error("{reason} at {location}")]
    Source { location: String, reason: String },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}
