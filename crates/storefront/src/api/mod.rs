//! Remote shop API client.
//!
//! Thin JSON-over-HTTP calls to the externally owned backend. There is no
//! retry, timeout or cancellation: a failed call returns an [`ApiError`] and
//! the caller decides what to show.

pub mod types;

use std::sync::Arc;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use kapee_core::{ApiErrorBody, Email, OrderRequest};

use types::{AuthResponse, CreatedOrder, LoginRequest, RegisterRequest, SubscribeRequest};

/// Errors that can occur when calling the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response (connection refused, DNS, TLS...).
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// An endpoint URL could not be built.
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the endpoint could not be reached at all.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// Client for the storefront endpoints of the remote API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:8000`).
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, mut base_url: Url) -> Self {
        // Joining relative paths onto "https://host/prefix" would drop
        // "prefix" without the trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        }
    }

    /// The API origin.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange credentials for a user and token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` carrying the server message (or
    /// "Failed to login") on rejection, `ApiError::Http` if unreachable.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.send_json(Method::POST, "api/users/login", Some(&body), None, "Failed to login")
            .await
    }

    /// Create an account and receive a session for it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` carrying the server message (or
    /// "Failed to register") on rejection, `ApiError::Http` if unreachable.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        fullname: &str,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let body = RegisterRequest {
            fullname,
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.send_json(
            Method::POST,
            "api/users/register",
            Some(&body),
            None,
            "Failed to register",
        )
        .await
    }

    // =========================================================================
    // Newsletter
    // =========================================================================

    /// Subscribe an email address to the newsletter.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` carrying the server `error` field (or
    /// "Subscription failed.") on rejection.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn subscribe(&self, email: &Email) -> Result<(), ApiError> {
        let body = SubscribeRequest {
            email: email.as_str(),
        };
        let response = self
            .request(Method::POST, "api/subscribe", Some(&body), None)
            .await?;
        Self::check_status(response, "Subscription failed.").await?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Hand an order to the order-creation endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or is rejected.
    #[instrument(skip(self, token, order), fields(lines = order.products.len()))]
    pub async fn create_order(
        &self,
        token: Option<&SecretString>,
        order: &OrderRequest,
    ) -> Result<CreatedOrder, ApiError> {
        let response = self
            .request(Method::POST, "api/orders/create", Some(order), token)
            .await?;
        let response = Self::check_status(response, "Failed to place order").await?;

        // An empty or non-JSON acknowledgement still means the order went in.
        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&SecretString>,
        default_message: &str,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(method, path, body, token).await?;
        let response = Self::check_status(response, default_message).await?;

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "failed to parse API response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.inner.base_url.join(path)?;
        debug!(%method, %url, "API request");

        let mut builder = self.inner.client.request(method, url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// Turn a non-success response into `ApiError::Status` with the best
    /// message the body offers.
    async fn check_status(
        response: reqwest::Response,
        default_message: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = ApiErrorBody::from_text(&text).message_or(default_message);
        tracing::warn!(status = %status, message = %message, "API returned non-success status");

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}
