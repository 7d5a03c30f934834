// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarvestError>;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GROBID returned status {status}: {body}")]
    Server { status: u16, body: String },

    #[error("TEI parsing error in {file}: {message}")]
    Tei { file: String, message: String },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HarvestError {
    /// True for failures worth retrying against the same server: a saturated
    /// GROBID instance (503) or a transport-level request failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            HarvestError::Server { status, .. } => *status == 503,
            HarvestError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}
