//! User management endpoints.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, instrument};

use kapee_core::{UserId, UserRole};

use crate::client::{AdminClient, Auth};
use crate::error::Result;

/// A user account as the back-office lists it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManagedUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(default, deserialize_with = "normalized_role")]
    pub role: UserRole,
}

fn normalized_role<'de, D>(deserializer: D) -> std::result::Result<UserRole, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(UserRole::from_server(raw.as_deref()))
}

/// Fields for creating or editing an account.
///
/// `password` is write-only; leave it `None` on edit to keep the current one.
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password: Option<SecretString>,
    pub role: UserRole,
}

impl std::fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDraft")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Serialize)]
struct UserPayload<'a> {
    username: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    role: UserRole,
}

impl<'a> From<&'a UserDraft> for UserPayload<'a> {
    fn from(draft: &'a UserDraft) -> Self {
        Self {
            username: &draft.username,
            email: &draft.email,
            password: draft
                .password
                .as_ref()
                .map(ExposeSecret::expose_secret)
                .filter(|p| !p.is_empty()),
            role: draft.role,
        }
    }
}

impl AdminClient {
    /// List all accounts.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::MissingToken` without sending anything when no
    /// token is configured, or the request/status error otherwise.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<ManagedUser>> {
        self.send_json::<(), _>(
            Method::GET,
            "api/users/users",
            None,
            Auth::Required,
            "Failed to fetch users",
        )
        .await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// As [`AdminClient::list_users`]; a rejection carries the server
    /// message or "Failed to add user".
    #[instrument(skip(self, draft), fields(email = %draft.email))]
    pub async fn create_user(&self, draft: &UserDraft) -> Result<()> {
        self.send(
            Method::POST,
            "api/users/register",
            Some(&UserPayload::from(draft)),
            Auth::Required,
            "Failed to add user",
        )
        .await?;
        info!(role = %draft.role, "user created");
        Ok(())
    }

    /// Replace an account's fields.
    ///
    /// # Errors
    ///
    /// As [`AdminClient::list_users`]; a rejection carries the server
    /// message or "Failed to update user".
    #[instrument(skip(self, draft), fields(user_id = %id))]
    pub async fn update_user(&self, id: &UserId, draft: &UserDraft) -> Result<()> {
        self.send(
            Method::PUT,
            &format!("api/users/users/{id}"),
            Some(&UserPayload::from(draft)),
            Auth::Required,
            "Failed to update user",
        )
        .await?;
        info!("user updated");
        Ok(())
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// As [`AdminClient::list_users`].
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<()> {
        self.send::<()>(
            Method::DELETE,
            &format!("api/users/users/{id}"),
            None,
            Auth::Required,
            "Failed to delete user",
        )
        .await?;
        info!("user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::error::AdminError;

    #[test]
    fn test_managed_user_role_normalized() {
        let user: ManagedUser = serde_json::from_value(serde_json::json!({
            "_id": "u1",
            "username": "root",
            "email": "root@example.com",
            "role": "ADMIN"
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::Admin);

        let user: ManagedUser = serde_json::from_value(serde_json::json!({
            "_id": "u2",
            "email": "x@example.com"
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::User);
    }

    #[test]
    fn test_payload_omits_blank_password() {
        let mut draft = UserDraft {
            username: "sam".to_owned(),
            email: "sam@example.com".to_owned(),
            password: Some(SecretString::from("")),
            role: UserRole::User,
        };
        let json = serde_json::to_value(UserPayload::from(&draft)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "user");

        draft.password = Some(SecretString::from("pw"));
        let json = serde_json::to_value(UserPayload::from(&draft)).unwrap();
        assert_eq!(json["password"], "pw");
    }

    #[test]
    fn test_draft_debug_redacts_password() {
        let draft = UserDraft {
            username: "sam".to_owned(),
            email: "sam@example.com".to_owned(),
            password: Some(SecretString::from("hunter2")),
            role: UserRole::Admin,
        };
        assert!(!format!("{draft:?}").contains("hunter2"));
    }

    #[tokio::test]
    async fn test_user_calls_need_token() {
        let client = AdminClient::new(Url::parse("http://127.0.0.1:9").unwrap(), None).unwrap();
        assert!(matches!(
            client.list_users().await,
            Err(AdminError::MissingToken)
        ));
        assert!(matches!(
            client.delete_user(&UserId::new("u1")).await,
            Err(AdminError::MissingToken)
        ));
    }
}
