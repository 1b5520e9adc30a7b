//! Client for the external identity provider.
//!
//! Sessions can be hosted and joined anonymously, so a missing provider is a
//! supported deployment mode. When a provider is configured it is consulted to
//! revoke credentials of disabled accounts and to relay password resets.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use uuid::Uuid;

/// Environment variable holding the provider base URL.
pub const IDENTITY_BASE_URL_ENV: &str = "IDENTITY_BASE_URL";
/// Environment variable holding the provider service key.
pub const IDENTITY_API_KEY_ENV: &str = "IDENTITY_API_KEY";

/// Errors raised while talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider did not answer within the configured deadline.
    #[error("identity provider call timed out")]
    Timeout,
    /// The request failed at the transport level.
    #[error("identity provider request failed")]
    Request(#[source] reqwest::Error),
    /// The provider answered with a non-success status.
    #[error("identity provider answered with status {status}")]
    Rejected {
        /// HTTP status returned by the provider.
        status: StatusCode,
    },
}

/// Result alias for identity provider calls.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Outbound calls this application makes against the identity provider.
pub trait IdentityProvider: Send + Sync {
    /// Revoke every active credential of the given account.
    fn sign_out(&self, user_id: Uuid) -> BoxFuture<'static, IdentityResult<()>>;

    /// Ask the provider to send a password reset to the given address.
    fn request_password_reset(&self, email: String) -> BoxFuture<'static, IdentityResult<()>>;
}

/// HTTP implementation backed by `reqwest`.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpIdentityProvider {
    /// Build a provider client with a hard per-call timeout.
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> IdentityResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(IdentityError::Request)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    /// Build the provider from `IDENTITY_BASE_URL` and `IDENTITY_API_KEY`.
    ///
    /// Returns `None` when no base URL is configured.
    pub fn from_env(timeout: Duration) -> IdentityResult<Option<Self>> {
        let Ok(base_url) = std::env::var(IDENTITY_BASE_URL_ENV) else {
            return Ok(None);
        };
        let api_key = std::env::var(IDENTITY_API_KEY_ENV).ok();
        Ok(Some(Self::new(base_url, api_key, timeout)?))
    }

    async fn post(&self, path: String, body: serde_json::Value) -> IdentityResult<()> {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                IdentityError::Timeout
            } else {
                IdentityError::Request(err)
            }
        })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(IdentityError::Rejected {
                status: response.status(),
            })
        }
    }
}

impl IdentityProvider for HttpIdentityProvider {
    fn sign_out(&self, user_id: Uuid) -> BoxFuture<'static, IdentityResult<()>> {
        let provider = self.clone();
        Box::pin(async move {
            provider
                .post(
                    format!("/auth/admin/users/{user_id}/sign-out"),
                    serde_json::json!({}),
                )
                .await
        })
    }

    fn request_password_reset(&self, email: String) -> BoxFuture<'static, IdentityResult<()>> {
        let provider = self.clone();
        Box::pin(async move {
            provider
                .post(
                    "/auth/recover".to_owned(),
                    serde_json::json!({ "email": email }),
                )
                .await
        })
    }
}

/// Provider used when no identity service is configured.
///
/// Every call succeeds without side effects; sign-outs are recorded so tests
/// can observe them.
#[derive(Default)]
pub struct NoopIdentityProvider {
    signed_out: std::sync::Mutex<Vec<Uuid>>,
}

impl NoopIdentityProvider {
    /// Construct an inert provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts that were asked to sign out, in call order.
    pub fn signed_out(&self) -> Vec<Uuid> {
        self.signed_out
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl IdentityProvider for NoopIdentityProvider {
    fn sign_out(&self, user_id: Uuid) -> BoxFuture<'static, IdentityResult<()>> {
        if let Ok(mut guard) = self.signed_out.lock() {
            guard.push(user_id);
        }
        Box::pin(async { Ok(()) })
    }

    fn request_password_reset(&self, _email: String) -> BoxFuture<'static, IdentityResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
