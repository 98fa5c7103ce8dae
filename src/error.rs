//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the flashcard server.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("invalid server URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("server returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Operations on the session controller that don't fit its current state.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no cards available for session")]
    EmptyBatch,
    #[error("no session in progress")]
    NotStudying,
}

/// Problems reading the configuration file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
