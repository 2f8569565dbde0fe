//! Wire types for the remote shop API.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use kapee_core::{Email, OrderId, User, UserId};

/// `POST /api/users/login` body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /api/users/register` body.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub fullname: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /api/subscribe` body.
#[derive(Debug, Serialize)]
pub struct SubscribeRequest<'a> {
    pub email: &'a str,
}

/// User object inside an auth response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub fullname: String,
    pub email: Email,
    #[serde(rename = "userRole", alias = "role")]
    pub user_role: Option<String>,
}

/// Successful login/register response.
#[derive(Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    pub token: String,
}

impl AuthResponse {
    /// Split into the normalized session user and the bearer token.
    #[must_use]
    pub fn into_session(self) -> (User, SecretString) {
        let AuthUser {
            id,
            fullname,
            email,
            user_role,
        } = self.user;
        (
            User::from_server(id, fullname, email, user_role.as_deref()),
            SecretString::from(self.token),
        )
    }
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Acknowledgement from the order-creation endpoint.
///
/// The backend's exact response shape is not fixed; only an id is picked out
/// when one is present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedOrder {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<OrderId>,
}
