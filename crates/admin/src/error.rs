//! Back-office client errors.

use thiserror::Error;

/// Errors that can occur when calling the back-office endpoints.
#[derive(Debug, Error)]
pub enum AdminError {
    /// A protected call was attempted without a bearer token.
    #[error("No token found. Please login.")]
    MissingToken,

    /// HTTP request failed before a response arrived.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Failed to parse the response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// An endpoint URL could not be built.
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
}

impl AdminError {
    /// Message suitable for display: the server's text for rejections.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::MissingToken => self.to_string(),
            Self::Http(_) => "Could not reach the shop API".to_string(),
            Self::Parse(_) | Self::Url(_) => "Unexpected response from the shop API".to_string(),
        }
    }
}

/// Result type alias for back-office operations.
pub type Result<T> = std::result::Result<T, AdminError>;
