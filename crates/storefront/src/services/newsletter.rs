//! Newsletter signup.

use tracing::{info, instrument};

use kapee_core::Email;

use crate::api::{ApiClient, ApiError};
use crate::validation::ValidationError;

/// Shown after a successful signup.
pub const SUBSCRIBED_MESSAGE: &str = "Subscribed successfully!";

/// Errors from a newsletter signup.
#[derive(Debug, thiserror::Error)]
pub enum NewsletterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl NewsletterError {
    /// Text for the signup form: the server's own complaint when it gave one.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Api(ApiError::Status { message, .. }) => message.clone(),
            Self::Api(_) => "Subscription failed.".to_owned(),
        }
    }
}

/// Subscribe `email` to the newsletter.
///
/// # Errors
///
/// Returns `NewsletterError::Validation` for a blank or malformed address
/// (nothing is sent), `NewsletterError::Api` when the request fails.
#[instrument(skip(api))]
pub async fn subscribe(api: &ApiClient, email: &str) -> Result<&'static str, NewsletterError> {
    if email.trim().is_empty() {
        return Err(ValidationError::MissingField("Email").into());
    }
    let email = Email::parse(email).map_err(ValidationError::from)?;

    api.subscribe(&email).await?;
    info!(email = %email, "newsletter subscription added");
    Ok(SUBSCRIBED_MESSAGE)
}
