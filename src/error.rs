//! Error handling for the allocator visualizer
//!
//! This module provides idiomatic Rust error types using thiserror for
//! better error messages and proper error chain handling.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the visualizer
#[derive(Error, Debug)]
pub enum VizError {
    #[error("Malformed document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// A string outside the key codec's output domain
#[derive(Error, Debug)]
#[error("Invalid serialized key '{raw}': {reason}")]
pub struct KeyDecodeError {
    pub raw: String,
    pub reason: String,
}

/// Errors from listing and fetching raw documents
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid filename '{name}'")]
    InvalidFilename { name: String },

    #[error("File '{name}' not found")]
    NotFound { name: String },

    #[error("Root directory {path:?} is unavailable: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid remote URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {var}")]
    Missing { var: String },

    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
}

/// Result alias for visualizer operations
pub type VizResult<T> = Result<T, VizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::Missing {
            var: "ROOT_DIRECTORY".into(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required environment variable ROOT_DIRECTORY"
        );

        let err: VizError = SourceError::NotFound {
            name: "runs/a.json".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Source error: File 'runs/a.json' not found");

        let err = KeyDecodeError {
            raw: "nope".into(),
            reason: "expected value".into(),
        };
        assert!(err.to_string().contains("nope"));
    }
}
