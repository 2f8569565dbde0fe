//! Authentication service.
//!
//! Exchanges credentials with the remote API and keeps the resulting
//! session in the [`SessionStore`].

mod error;

pub use error::AuthError;

use secrecy::SecretString;
use tracing::{info, instrument};

use kapee_core::{Email, User};

use crate::api::ApiClient;
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::session::SessionStore;
use crate::storage::Storage;
use crate::validation::{RegistrationForm, validate_login};

/// Authentication service.
///
/// Owns the session; everything else reads the current user through it.
pub struct AuthService<S> {
    api: ApiClient,
    session: SessionStore<S>,
}

impl<S: Storage> AuthService<S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionStore<S>) -> Self {
        Self { api, session }
    }

    /// Login with email and password.
    ///
    /// On success the user and token are persisted and the user is returned.
    /// On failure the previous session (if any) is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for blank or malformed input (no
    /// request is sent), `AuthError::Rejected` with the server message (or
    /// "Failed to login") when the API refuses, `AuthError::Network` if it
    /// cannot be reached.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        let email = validate_login(email, password)?;
        let response = self.api.login(&email, password).await?;
        self.start_session(response.into_session())
    }

    /// Register a new account and log into it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with the server message (or
    /// "Failed to register") when the API refuses, `AuthError::Network` if
    /// it cannot be reached.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &mut self,
        fullname: &str,
        email: &Email,
        password: &SecretString,
    ) -> Result<User, AuthError> {
        let response = self.api.register(fullname, email, password).await?;
        self.start_session(response.into_session())
    }

    /// Validate a sign-up form, then register.
    ///
    /// A mismatched password confirmation is reported without contacting
    /// the API.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for local problems, otherwise as
    /// [`AuthService::register`].
    pub async fn register_form(&mut self, form: RegistrationForm) -> Result<User, AuthError> {
        let valid = form.validate()?;
        self.register(&valid.fullname, &valid.email, &valid.password)
            .await
    }

    /// Log out. No remote call is made; safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the durable entries cannot be removed
    /// (the in-memory session is gone regardless).
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.session.clear()?;
        clear_sentry_user();
        add_breadcrumb("auth", "Logged out", None);
        Ok(())
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    /// The underlying session store.
    #[must_use]
    pub const fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// The remote API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Tear the service down and return its session store.
    pub fn into_session(self) -> SessionStore<S> {
        self.session
    }

    fn start_session(&mut self, (user, token): (User, SecretString)) -> Result<User, AuthError> {
        self.session.establish(user.clone(), token)?;
        set_sentry_user(&user.id, Some(user.email.as_str()));
        add_breadcrumb("auth", "Logged in", Some(&[("role", user.role.as_str())]));
        info!(user_id = %user.id, role = %user.role, "authenticated");
        Ok(user)
    }
}
