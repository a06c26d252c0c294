//! API errors and their HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use alloc_viz::{SourceError, VizError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid filename parameter")]
    InvalidFilename,

    #[error("file not found")]
    NotFound,

    #[error("failed to list files")]
    List(#[source] SourceError),

    #[error("failed to get files")]
    Fetch(#[source] SourceError),

    #[error("{0}")]
    MalformedDocument(#[source] VizError),

    #[error("failed to build visualization")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// Map a fetch failure, keeping caller mistakes distinguishable
    pub fn from_fetch(error: SourceError) -> Self {
        match error {
            SourceError::InvalidFilename { .. } => Self::InvalidFilename,
            SourceError::NotFound { .. } => Self::NotFound,
            other => Self::Fetch(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidFilename => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MalformedDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::List(_) | Self::Fetch(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match std::error::Error::source(&self) {
                Some(source) => tracing::error!("{}: {}", self, source),
                None => tracing::error!("{}", self),
            }
        } else {
            tracing::warn!("{}", self);
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_mapping() {
        let err = ApiError::from_fetch(SourceError::InvalidFilename {
            name: "../x".into(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "invalid filename parameter");

        let err = ApiError::from_fetch(SourceError::NotFound { name: "x".into() });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::from_fetch(SourceError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "failed to get files");
    }
}
