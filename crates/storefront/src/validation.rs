//! Local form validation.
//!
//! Everything here runs before any remote call is made.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use kapee_core::{Email, EmailError};

/// Input rejected before reaching the remote API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// A required field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Checkout was attempted with nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,
}

/// Sign-up form, as entered.
pub struct RegistrationForm {
    pub fullname: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// A registration that passed local checks.
pub struct ValidRegistration {
    pub fullname: String,
    pub email: Email,
    pub password: SecretString,
}

impl RegistrationForm {
    /// Check the form without touching the network.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: a blank field, a malformed email,
    /// or a password confirmation that does not match.
    pub fn validate(self) -> Result<ValidRegistration, ValidationError> {
        let fullname = self.fullname.trim();
        if fullname.is_empty() {
            return Err(ValidationError::MissingField("Full name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("Email"));
        }
        let email = Email::parse(&self.email)?;
        if self.password.expose_secret().is_empty() {
            return Err(ValidationError::MissingField("Password"));
        }
        if self.password.expose_secret() != self.confirm_password.expose_secret() {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(ValidRegistration {
            fullname: fullname.to_owned(),
            email,
            password: self.password,
        })
    }
}

/// Check login input.
///
/// # Errors
///
/// Returns `ValidationError` for a blank or malformed email or a blank
/// password.
pub fn validate_login(email: &str, password: &SecretString) -> Result<Email, ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::MissingField("Email"));
    }
    let email = Email::parse(email)?;
    if password.expose_secret().is_empty() {
        return Err(ValidationError::MissingField("Password"));
    }
    Ok(email)
}
