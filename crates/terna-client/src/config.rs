//! Client configuration.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use terna_core::{Result, TernaError};
use tracing::Level;

/// Token endpoint of the Terna transparency API.
pub const DEFAULT_AUTH_URL: &str = "https://api.terna.it/transparency/oauth/accessToken";

/// Base URL of the Terna transparency data endpoints.
pub const DEFAULT_BASE_URL: &str = "https://api.terna.it/transparency/v1.0/";

/// Minimum spacing between two outbound calls.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1100);

/// Settings used to build a [`TernaClient`](crate::TernaClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// Client id issued by the Terna developer portal.
    pub api_key: String,
    /// Client secret issued by the Terna developer portal.
    pub api_secret: String,
    /// Token endpoint URL.
    pub auth_url: String,
    /// Base URL the endpoint paths are appended to.
    pub base_url: String,
    /// Proxy URL applied to every request.
    pub proxy: Option<String>,
    /// Timeout bounding each individual HTTP call.
    pub timeout: Option<Duration>,
    /// Minimum interval between two outbound calls.
    pub min_interval: Duration,
    /// Installs a console subscriber at this level when set.
    pub log_level: Option<Level>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("auth_url", &self.auth_url)
            .field("base_url", &self.base_url)
            .field("proxy", &self.proxy)
            .field("timeout", &self.timeout)
            .field("min_interval", &self.min_interval)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with default endpoints and rate limit.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy: None,
            timeout: None,
            min_interval: DEFAULT_MIN_INTERVAL,
            log_level: None,
        }
    }

    /// Load configuration from environment variables, reading `.env` first.
    ///
    /// `TERNA_API_KEY` and `TERNA_API_SECRET` are required; `TERNA_BASE_URL`,
    /// `TERNA_AUTH_URL`, `TERNA_PROXY`, `TERNA_TIMEOUT_SECS` and
    /// `TERNA_LOG_LEVEL` are optional.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("TERNA_API_KEY")
            .ok_or_else(|| TernaError::Configuration("TERNA_API_KEY not set".to_string()))?;
        let api_secret = lookup("TERNA_API_SECRET")
            .ok_or_else(|| TernaError::Configuration("TERNA_API_SECRET not set".to_string()))?;

        let mut config = Self::new(api_key, api_secret);

        if let Some(base_url) = lookup("TERNA_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(auth_url) = lookup("TERNA_AUTH_URL") {
            config.auth_url = auth_url;
        }
        config.proxy = lookup("TERNA_PROXY").filter(|p| !p.trim().is_empty());

        if let Some(secs) = lookup("TERNA_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| TernaError::Configuration("Invalid TERNA_TIMEOUT_SECS".to_string()))?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        if let Some(level) = lookup("TERNA_LOG_LEVEL") {
            let level = Level::from_str(level.trim())
                .map_err(|_| TernaError::Configuration("Invalid TERNA_LOG_LEVEL".to_string()))?;
            config.log_level = Some(level);
        }

        Ok(config)
    }

    /// Set the base URL of the data endpoints.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the token endpoint URL.
    #[must_use]
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Route every request through a proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Bound each HTTP call by a timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the minimum interval between two outbound calls.
    #[must_use]
    pub const fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Install a console log subscriber at this level on client construction.
    #[must_use]
    pub const fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Check the settings that must be present before any request is made.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(TernaError::Configuration("API key cannot be empty".to_string()));
        }
        if self.api_secret.trim().is_empty() {
            return Err(TernaError::Configuration(
                "API secret cannot be empty".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() || self.auth_url.trim().is_empty() {
            return Err(TernaError::Configuration(
                "Endpoint URLs cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("key", "secret");
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.min_interval, Duration::from_millis(1100));
        assert!(config.timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_reads_optional_settings() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TERNA_API_KEY", "key"),
            ("TERNA_API_SECRET", "secret"),
            ("TERNA_TIMEOUT_SECS", "30"),
            ("TERNA_PROXY", "http://proxy.local:3128"),
            ("TERNA_LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.local:3128"));
        assert_eq!(config.log_level, Some(Level::DEBUG));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_lookup_requires_credentials() {
        let result = ClientConfig::from_lookup(lookup(&[("TERNA_API_KEY", "key")]));
        assert!(matches!(result, Err(TernaError::Configuration(_))));
    }

    #[test]
    fn test_from_lookup_rejects_invalid_timeout() {
        let result = ClientConfig::from_lookup(lookup(&[
            ("TERNA_API_KEY", "key"),
            ("TERNA_API_SECRET", "secret"),
            ("TERNA_TIMEOUT_SECS", "soon"),
        ]));
        assert!(matches!(result, Err(TernaError::Configuration(_))));
    }

    #[test]
    fn test_blank_credentials_fail_validation() {
        assert!(ClientConfig::new("", "secret").validate().is_err());
        assert!(ClientConfig::new("key", "  ").validate().is_err());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let debug_str = format!("{:?}", ClientConfig::new("key_12345", "secret_67890"));
        assert!(!debug_str.contains("key_12345"));
        assert!(!debug_str.contains("secret_67890"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
