//! Error types of the HTTP layer and their status codes.

use std::time::Duration;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use pwhash_core::{ManagerError, ParseTaskIdError};
use thiserror::Error;

/// A request the orchestrator answers with a non-2xx status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("field {0} is missing")]
    MissingField(&'static str),

    #[error("invalid form: {0}")]
    InvalidForm(String),

    #[error("invalid hash id: {0}")]
    InvalidId(#[from] ParseTaskIdError),

    /// Pending task. Carries the retry hint sent back as `Retry-After`.
    #[error("hash is not ready yet")]
    NotReady { retry_after: Duration },

    #[error(transparent)]
    Manager(ManagerError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::InvalidForm(_) | ApiError::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotReady { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Manager(e) => match e {
                ManagerError::WeakInput => StatusCode::BAD_REQUEST,
                ManagerError::NotFound(_) => StatusCode::NOT_FOUND,
                ManagerError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
                ManagerError::ShuttingDown
                | ManagerError::AlreadyShuttingDown
                | ManagerError::TaskFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<ManagerError> for ApiError {
    fn from(e: ManagerError) -> Self {
        ApiError::Manager(e)
    }
}

/// Whole seconds, rounded up, never below 1.
pub(crate) fn retry_after_secs(delay: Duration) -> u64 {
    let secs = delay.as_secs() + u64::from(delay.subsec_nanos() > 0);
    secs.max(1)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, self.to_string()).into_response();
        if let ApiError::NotReady { retry_after } = self {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(retry_after_secs(retry_after)),
            );
        }
        response
    }
}

/// Failure to start or run the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
