use std::io;
use thiserror::Error;

/// Custom error type for the Vigil application
#[derive(Error, Debug)]
pub enum VigilError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the Vigil application
pub type Result<T> = std::result::Result<T, VigilError>;
