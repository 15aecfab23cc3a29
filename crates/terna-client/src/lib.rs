#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/fgenoese/terna-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Terna transparency API client.
//!
//! This crate implements the terna-core provider traits over the
//! [Terna transparency API](https://developer.terna.it/).
//!
//! # Usage
//!
//! ```rust,ignore
//! use terna_client::{ClientConfig, TernaClient};
//! use terna_core::{BiddingZone, LoadDataProvider};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TernaClient::new(ClientConfig::new("client_id", "client_secret"))?;
//!
//!     let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//!     let end = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
//!
//!     if let Some(table) = client.total_load(start, end, &BiddingZone::ITALY).await? {
//!         println!("{}", table.to_dataframe()?);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Proxy, StatusCode};
use serde_json::Value;
use terna_core::{RETRYABLE_STATUS_CODES, Result, Table, TernaError, transform};
use tracing::{debug, instrument, warn};

/// Client configuration.
pub mod config;
/// Endpoint paths and the provider trait implementations.
pub mod endpoints;
/// Console logging setup.
pub mod logging;
/// Shared minimum-interval gate.
pub mod rate_limit;
/// Access token cache.
pub mod token;

pub use config::ClientConfig;
pub use logging::init_tracing;
pub use rate_limit::RateLimiter;
pub use token::{Credential, TokenManager};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("terna-client/", env!("CARGO_PKG_VERSION"));

/// Ordered query parameters of one endpoint call.
pub type QueryParams = Vec<(&'static str, String)>;

/// Terna transparency API client.
///
/// Holds the cached access token and the rate-limit state; share one instance
/// (e.g. behind an `Arc`) to keep every call behind the same gate.
pub struct TernaClient {
    http: Client,
    base_url: String,
    timeout: Option<Duration>,
    tokens: TokenManager,
    limiter: RateLimiter,
}

impl fmt::Debug for TernaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TernaClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("tokens", &self.tokens)
            .field("limiter", &self.limiter)
            .finish()
    }
}

impl TernaClient {
    /// Create a client, building its HTTP transport from the configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(proxy) = &config.proxy {
            let proxy = Proxy::all(proxy)
                .map_err(|e| TernaError::Configuration(format!("Invalid proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| TernaError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self::from_parts(http, config))
    }

    /// Create a client with a caller-supplied HTTP transport.
    ///
    /// The configured proxy is not applied to a supplied client; the timeout
    /// still bounds every call.
    pub fn with_client(client: Client, config: ClientConfig) -> Result<Self> {
        config.validate()?;

        if config.proxy.is_some() {
            warn!("Proxy setting is ignored for a caller-supplied HTTP client");
        }

        Ok(Self::from_parts(client, config))
    }

    /// Create a client from `TERNA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    fn from_parts(http: Client, config: ClientConfig) -> Self {
        if let Some(level) = config.log_level {
            init_tracing(level);
        }

        let tokens = TokenManager::new(
            http.clone(),
            config.auth_url,
            config.api_key,
            config.api_secret,
            config.timeout,
        );

        Self {
            http,
            base_url: config.base_url,
            timeout: config.timeout,
            tokens,
            limiter: RateLimiter::new(config.min_interval),
        }
    }

    /// Return a valid access token, renewing it when needed.
    pub async fn ensure_token(&self) -> Result<Credential> {
        self.tokens.ensure_token(&self.limiter).await
    }

    /// Fetch an endpoint and normalize its payload.
    ///
    /// Returns `Ok(None)` when the payload holds no rows. Failures are never
    /// retried.
    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<Option<Table>> {
        let credential = self.ensure_token().await?;

        let url = self.url(endpoint);
        debug!(url = %url, ?params, "Requesting data");

        let mut request = self
            .http
            .get(&url)
            .bearer_auth(credential.token())
            .query(params);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = self
            .limiter
            .throttle(request.send())
            .await
            .map_err(|e| TernaError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log_http_failure(endpoint, status);
            let message = response.text().await.unwrap_or_default();
            return Err(TernaError::Request {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| TernaError::Parse(format!("Invalid JSON from {endpoint}: {e}")))?;

        transform(payload)
    }

    /// Build the full URL of an endpoint path.
    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

/// Log a non-success status; rate-limit and server errors at `warn`.
pub(crate) fn log_http_failure(target: &str, status: StatusCode) {
    if RETRYABLE_STATUS_CODES.contains(&status.as_u16()) {
        warn!(
            endpoint = target,
            status = status.as_u16(),
            "Retryable HTTP failure, not retried"
        );
    } else {
        debug!(endpoint = target, status = status.as_u16(), "HTTP failure");
    }
}
