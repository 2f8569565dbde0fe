//! Session user.

use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId, UserRole};

/// The authenticated shopper or administrator.
///
/// This is exactly what the session persists under the `user` storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub fullname: String,
    pub email: Email,
    pub role: UserRole,
}

impl User {
    /// Build a user from fields returned by the remote API.
    ///
    /// `server_role` is the raw `userRole` value; it is normalized here so
    /// every user constructed from server data goes through one place.
    #[must_use]
    pub fn from_server(
        id: UserId,
        fullname: String,
        email: Email,
        server_role: Option<&str>,
    ) -> Self {
        Self {
            id,
            fullname,
            email,
            role: UserRole::from_server(server_role),
        }
    }

    /// Whether the user may open the back-office.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_server_normalizes_role() {
        let user = User::from_server(
            UserId::new("u1"),
            "Ada Lovelace".to_owned(),
            Email::parse("ada@example.com").unwrap(),
            Some("Admin"),
        );
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.is_admin());
    }

    #[test]
    fn test_stored_shape() {
        let user = User::from_server(
            UserId::new("u1"),
            "Ada".to_owned(),
            Email::parse("ada@example.com").unwrap(),
            None,
        );
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "u1",
                "fullname": "Ada",
                "email": "ada@example.com",
                "role": "user"
            })
        );
    }
}
