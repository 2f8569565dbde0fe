//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for front ends. `user_message` gives
//! the text to show; `report` sends unexpected failures to Sentry.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::services::newsletter::NewsletterError;
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Durable storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout was refused or failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Newsletter signup failed.
    #[error("Newsletter error: {0}")]
    Newsletter(#[from] NewsletterError),

    /// Input rejected locally.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A product id that is not in the catalog.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether this is our fault (or the backend's) rather than the user's.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Storage(_)
                | Self::Api(_)
                | Self::Auth(AuthError::Network(_) | AuthError::Storage(_))
                | Self::Checkout(CheckoutError::Api(_))
        )
    }

    /// Text safe to show the user.
    ///
    /// Server-provided rejection messages are passed through; internal
    /// details are not.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) => "The shop is misconfigured".to_string(),
            Self::Storage(_) => "Could not save your session".to_string(),
            Self::Api(ApiError::Status { message, .. })
            | Self::Auth(AuthError::Rejected { message, .. }) => message.clone(),
            Self::Api(_) | Self::Auth(AuthError::Network(_)) => {
                "Could not reach the shop, please try again".to_string()
            }
            Self::Auth(AuthError::Validation(e)) | Self::Validation(e) => e.to_string(),
            Self::Auth(AuthError::Storage(_)) => "Could not save your session".to_string(),
            Self::Checkout(err) => match err {
                CheckoutError::LoginRequired { .. } => "Please log in to continue".to_string(),
                CheckoutError::Validation(e) => e.to_string(),
                CheckoutError::Api(ApiError::Status { message, .. }) => message.clone(),
                CheckoutError::Api(_) => {
                    "Could not place your order, please try again".to_string()
                }
            },
            Self::Newsletter(err) => err.user_message(),
            Self::NotFound(what) => format!("Not found: {what}"),
        }
    }

    /// Log the error and, for internal failures, capture it to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "operation failed");
        } else {
            tracing::warn!(error = %self, "operation refused");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "p1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_passes_through() {
        let err = AppError::from(AuthError::Rejected {
            status: 401,
            message: "Invalid credentials".to_string(),
        });
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::from(ApiError::Parse("expected value at line 1".to_string()));
        assert!(err.is_internal());
        assert!(!err.user_message().contains("line 1"));
    }

    #[test]
    fn test_checkout_messages() {
        let err = AppError::from(CheckoutError::LoginRequired {
            redirect: "/account",
        });
        assert_eq!(err.user_message(), "Please log in to continue");

        let err = AppError::from(CheckoutError::Validation(ValidationError::EmptyCart));
        assert_eq!(err.user_message(), "Your cart is empty");
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("p9".to_string());
        assert_eq!(err.to_string(), "Not found: p9");
        assert_eq!(
            AppError::from(ValidationError::PasswordMismatch).to_string(),
            "Validation error: Passwords do not match"
        );
    }

    #[test]
    fn test_sentry_helpers_without_client() {
        // No client is bound in tests; these must be harmless no-ops.
        set_sentry_user(&"u1", Some("a@example.com"));
        add_breadcrumb("test", "noop", Some(&[("k", "v")]));
        clear_sentry_user();
    }
}
