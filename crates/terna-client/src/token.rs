//! Access token acquisition and caching.
//!
//! The API issues short-lived bearer tokens through a client-credential
//! exchange. The token is cached in a single slot and reused until it is
//! within [`EXPIRY_MARGIN_SECS`] of its expiry, then replaced on the next call.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use serde::Deserialize;
use terna_core::{Result, TernaError};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::log_http_failure;
use crate::rate_limit::RateLimiter;

/// A cached token is renewed once it expires within this many seconds.
pub const EXPIRY_MARGIN_SECS: i64 = 5;

/// An access token and its absolute expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: DateTime<Utc>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Credential {
    /// Create a credential.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// The bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// When the token stops being accepted.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the token is still usable at `now`, safety margin included.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now > TimeDelta::seconds(EXPIRY_MARGIN_SECS)
    }
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Owns the credential slot and performs the credential exchange.
pub struct TokenManager {
    http: Client,
    auth_url: String,
    api_key: String,
    api_secret: String,
    timeout: Option<Duration>,
    slot: Mutex<Option<Credential>>,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("auth_url", &self.auth_url)
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenManager {
    /// Create a token manager with an empty slot.
    #[must_use]
    pub fn new(
        http: Client,
        auth_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            http,
            auth_url: auth_url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            timeout,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached credential, exchanging a new one if it is missing or
    /// about to expire.
    ///
    /// The slot stays locked during the exchange so concurrent callers never
    /// issue two exchanges for the same expiry.
    pub async fn ensure_token(&self, limiter: &RateLimiter) -> Result<Credential> {
        let mut slot = self.slot.lock().await;

        if let Some(credential) = slot.as_ref().filter(|c| c.is_fresh_at(Utc::now())) {
            debug!("Using cached access token");
            return Ok(credential.clone());
        }

        let credential = self.exchange(limiter).await?;
        *slot = Some(credential.clone());
        Ok(credential)
    }

    /// The credential currently held, if any.
    pub async fn current(&self) -> Option<Credential> {
        self.slot.lock().await.clone()
    }

    async fn exchange(&self, limiter: &RateLimiter) -> Result<Credential> {
        info!("Requesting new access token");

        let form = [
            ("client_id", self.api_key.as_str()),
            ("client_secret", self.api_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let mut request = self.http.post(&self.auth_url).form(&form);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = limiter
            .throttle(request.send())
            .await
            .map_err(|e| TernaError::Network(format!("Token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            log_http_failure("token exchange", status);
            let message = response.text().await.unwrap_or_default();
            return Err(TernaError::Authentication {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| TernaError::Parse(format!("Invalid token response: {e}")))?;

        let expires_at = TimeDelta::try_seconds(body.expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                TernaError::Parse(format!("Invalid expires_in: {}", body.expires_in))
            })?;
        debug!(%expires_at, "Access token renewed");

        Ok(Credential::new(body.access_token, expires_at))
    }
}
