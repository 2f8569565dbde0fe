//! Back-office HTTP client.
//!
//! Wraps a `reqwest::Client`, the API origin and the admin's bearer token.
//! Endpoint groups live in [`crate::users`] and [`crate::orders`].

use std::sync::Arc;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use kapee_core::ApiErrorBody;

use crate::error::{AdminError, Result};

/// Shown when the admin's name cannot be fetched.
pub const FALLBACK_ADMIN_NAME: &str = "Admin";

/// Whether a call must carry the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    Required,
    IfPresent,
}

/// Client for the back-office endpoints of the remote API.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &self.inner.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[derive(serde::Deserialize)]
struct MeResponse {
    #[serde(default)]
    name: Option<String>,
}

impl AdminClient {
    /// Create a client rooted at `base_url`, authenticating with `token`
    /// when one is available.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url, token: Option<SecretString>) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, base_url, token))
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        mut base_url: Url,
        token: Option<SecretString>,
    ) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(AdminClientInner {
                client,
                base_url,
                token: token.filter(|t| !t.expose_secret().is_empty()),
            }),
        }
    }

    /// The API origin.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Whether a bearer token is configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner.token.is_some()
    }

    /// Display name of the logged-in admin.
    ///
    /// The request goes out with or without a token; the backend may still
    /// recognise the admin by other means. Never fails: any problem
    /// (refusal, unreachable API, missing name) yields [`FALLBACK_ADMIN_NAME`].
    #[instrument(skip(self))]
    pub async fn me(&self) -> String {
        let response = self
            .send_json::<(), MeResponse>(
                Method::GET,
                "api/admin/me",
                None,
                Auth::IfPresent,
                "Failed to fetch admin",
            )
            .await;

        match response {
            Ok(MeResponse { name: Some(name) }) if !name.trim().is_empty() => name,
            Ok(_) => FALLBACK_ADMIN_NAME.to_string(),
            Err(e) => {
                warn!(error = %e, "could not fetch admin name");
                FALLBACK_ADMIN_NAME.to_string()
            }
        }
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth,
        default_message: &str,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body, auth, default_message).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "failed to parse admin API response"
            );
            AdminError::Parse(e.to_string())
        })
    }

    /// Send a request and check its status, discarding the body.
    pub(crate) async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth,
        default_message: &str,
    ) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let token = match (auth, &self.inner.token) {
            (Auth::Required, None) => return Err(AdminError::MissingToken),
            (_, token) => token.as_ref(),
        };

        let url = self.inner.base_url.join(path)?;
        debug!(%method, %url, "admin API request");

        let mut builder = self.inner.client.request(method, url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = ApiErrorBody::from_text(&text).message_or(default_message);
        tracing::warn!(status = %status, message = %message, "admin API returned non-success status");

        Err(AdminError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn offline(token: Option<&str>) -> AdminClient {
        AdminClient::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            token.map(SecretString::from),
        )
        .unwrap()
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        assert!(!offline(Some("")).has_token());
        assert!(offline(Some("t")).has_token());
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", offline(Some("super-secret")));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_me_falls_back_without_token() {
        assert_eq!(offline(None).me().await, FALLBACK_ADMIN_NAME);
    }

    #[tokio::test]
    async fn test_me_falls_back_when_unreachable() {
        assert_eq!(offline(Some("t")).me().await, FALLBACK_ADMIN_NAME);
    }
}
