//! Session store.
//!
//! Holds the logged-in user and their bearer token, mirrored into durable
//! storage so the session survives restarts.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use kapee_core::User;

use crate::storage::{Storage, StorageError};

/// Storage keys for session data.
pub mod keys {
    /// Key for the serialized [`kapee_core::User`].
    pub const USER: &str = "user";

    /// Key for the opaque bearer token.
    pub const TOKEN: &str = "token";
}

/// The persisted authentication state.
pub struct SessionStore<S> {
    storage: S,
    user: Option<User>,
    token: Option<SecretString>,
}

impl<S: Storage> SessionStore<S> {
    /// Create the store and hydrate it from `storage`.
    ///
    /// A stored user that fails to parse is treated as absent; a storage read
    /// failure is logged and treated the same way.
    pub fn new(storage: S) -> Self {
        let user = match storage.get(keys::USER) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "ignoring malformed stored user");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "could not read stored user");
                None
            }
        };

        let token = match storage.get(keys::TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "could not read stored token");
                None
            }
        };

        debug!(
            has_user = user.is_some(),
            has_token = token.is_some(),
            "session hydrated"
        );

        Self {
            storage,
            user,
            token,
        }
    }

    /// Persist a new session and make it current.
    ///
    /// Storage is written first. If either write fails, the stored user is
    /// put back to what it was and the previous session stays current, both
    /// in memory and on the next hydrate.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the user or token cannot be written.
    pub fn establish(&mut self, user: User, token: SecretString) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(&user)?;
        let previous_user = self.storage.get(keys::USER)?;
        self.storage.set(keys::USER, &serialized)?;

        if let Err(e) = self.storage.set(keys::TOKEN, token.expose_secret()) {
            let restored = match previous_user.as_deref() {
                Some(raw) => self.storage.set(keys::USER, raw),
                None => self.storage.remove(keys::USER),
            };
            if let Err(restore_err) = restored {
                warn!(error = %restore_err, "could not restore stored user after failed login");
            }
            return Err(e);
        }

        info!(user_id = %user.id, role = %user.role, "session established");
        self.user = Some(user);
        self.token = Some(token);
        Ok(())
    }

    /// Forget the current session. Calling this without a session is fine.
    ///
    /// The in-memory session is dropped even if the storage write fails.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the durable entries cannot be removed.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "session cleared");
        }
        self.token = None;
        self.storage.remove(keys::USER)?;
        self.storage.remove(keys::TOKEN)
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The bearer token, if any.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Tear the store down and hand back its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl<S> std::fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}
