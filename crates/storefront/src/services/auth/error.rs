//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The API refused the credentials or the registration.
    #[error("{message}")]
    Rejected {
        /// HTTP status returned by the API.
        status: u16,
        /// Server-provided message, or the operation's default.
        message: String,
    },

    /// The API could not be reached or answered nonsense.
    #[error("network error: {0}")]
    Network(ApiError),

    /// Input failed local checks; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The session could not be persisted.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } => Self::Rejected { status, message },
            other => Self::Network(other),
        }
    }
}
