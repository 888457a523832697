//! Bearer token acquisition
//!
//! The gateway asks an [`Authenticator`] for a token on every call. Tokens
//! are not cached here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gc_core::AuthConfig;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::error::{ContactsError, Result};
use crate::models::ScopeSet;
use crate::query;

/// Prefix applied to short scope names
pub const GOOGLE_SCOPE_PREFIX: &str = "https://www.googleapis.com/auth/";

/// Supplies bearer tokens for a set of scopes
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn acquire_token(&self, scopes: &ScopeSet) -> Result<String>;
}

/// Hands out a fixed, pre-issued token regardless of scope
pub struct StaticTokenAuthenticator {
    token: String,
}

impl StaticTokenAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn acquire_token(&self, _scopes: &ScopeSet) -> Result<String> {
        if self.token.is_empty() {
            return Err(ContactsError::Authentication("access token is empty".to_string()));
        }
        Ok(self.token.clone())
    }
}

/// OAuth2 refresh-token grant
pub struct RefreshTokenAuthenticator {
    client: Client,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl RefreshTokenAuthenticator {
    /// Create an authenticator against the default Google token endpoint
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContactsError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            token_url: AuthConfig::default().token_url,
        })
    }

    /// Override the token endpoint
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }
}

#[async_trait]
impl Authenticator for RefreshTokenAuthenticator {
    async fn acquire_token(&self, scopes: &ScopeSet) -> Result<String> {
        let scope = scopes.iter().map(expand_scope).collect::<Vec<_>>().join(" ");

        let form = query::encode(&[
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("refresh_token", self.refresh_token.clone()),
            ("grant_type", "refresh_token".to_string()),
            ("scope", scope),
        ])?;

        debug!("Requesting access token from: {}", self.token_url);

        let response = self
            .client
            .post(&self.token_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .map_err(|e| ContactsError::Connection(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ContactsError::HttpError(e.to_string()))?;
        let body: Option<TokenResponse> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let reason = body
                .and_then(|b| b.error_description.or(b.error))
                .unwrap_or(text);
            error!("Token request failed: {} - {}", status, reason);
            return Err(ContactsError::Authentication(format!(
                "token endpoint returned {}: {}",
                status, reason
            )));
        }

        body.and_then(|b| b.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ContactsError::Authentication("token response has no access_token".to_string())
            })
    }
}

/// Expand a short scope name (`contacts`) to its full URL form
pub fn expand_scope(scope: &str) -> String {
    if scope.starts_with("https://") || scope.starts_with("http://") {
        scope.to_string()
    } else {
        format!("{}{}", GOOGLE_SCOPE_PREFIX, scope)
    }
}

/// Pick an authenticator from configuration.
///
/// A static access token wins; otherwise the refresh-token grant is used.
pub fn authenticator_from_config(
    config: &AuthConfig,
    timeout: Duration,
) -> Result<Arc<dyn Authenticator>> {
    if let Some(token) = config.access_token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(Arc::new(StaticTokenAuthenticator::new(token)));
    }

    if config.has_refresh_credentials() {
        let auth = RefreshTokenAuthenticator::new(
            config.client_id.clone().unwrap_or_default(),
            config.client_secret.clone().unwrap_or_default(),
            config.refresh_token.clone().unwrap_or_default(),
            timeout,
        )?
        .with_token_url(config.token_url.clone());
        return Ok(Arc::new(auth));
    }

    Err(ContactsError::Configuration(
        "set GOOGLE_ACCESS_TOKEN, or GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REFRESH_TOKEN"
            .to_string(),
    ))
}
