//! Configuration management
//!
//! All settings are passed explicitly at construction time. The JDBC-style
//! property names accepted by [`TransportConfig::from_properties`] match the
//! ones the driver layer already collects from its callers.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUTH_HOST, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RESPONSE_TIMEOUT_MS, DEFAULT_RETRY_BACKOFF_MS,
};
use crate::errors::{Result, TransportError};

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Backend query-service URL every request is POSTed to.
    pub endpoint: String,
    pub credentials: Credentials,
    /// Substitute a sentinel token instead of calling the credential exchange.
    /// Only meant for integration tests against a backend without auth.
    #[serde(default)]
    pub bypass_auth: bool,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Client credentials for the credential exchange.
///
/// Immutable for the lifetime of one transport instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Credential-exchange host override; `None` uses [`DEFAULT_AUTH_HOST`].
    #[serde(default)]
    pub auth_host: Option<String>,
    #[serde(default)]
    pub client_id: String,
    #[serde(default, skip_serializing)]
    pub client_secret: String,
    /// Target instance (tenant) the token is scoped to.
    pub instance_id: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_ms: u64,
    pub response_timeout_ms: u64,
    /// Physical attempts per logical call (initial try + retries).
    pub max_attempts: u32,
    /// Base delay between attempts. Zero retries immediately.
    pub retry_backoff_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub json: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            auth_host: None,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            instance_id: instance_id.into(),
        }
    }

    #[must_use]
    pub fn with_auth_host(mut self, auth_host: impl Into<String>) -> Self {
        self.auth_host = Some(auth_host.into());
        self
    }

    /// Credential-exchange host, falling back to the production default when
    /// no override (or an empty one) is configured.
    pub fn auth_host(&self) -> &str {
        match self.auth_host.as_deref() {
            Some(host) if !host.trim().is_empty() => host.trim_end_matches('/'),
            _ => DEFAULT_AUTH_HOST,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_host", &self.auth_host)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("instance_id", &self.instance_id)
            .finish()
    }
}

impl TransportConfig {
    pub fn new(endpoint: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials,
            bypass_auth: false,
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Build a configuration from JDBC-style connection properties.
    ///
    /// Recognized keys: `url`, `amOauthHost`, `user`, `password`,
    /// `instanceId`, `bypassAuth`, `enableLogging`, `connectTimeoutMs`,
    /// `responseTimeoutMs`, `maxAttempts`. Unknown keys are ignored.
    ///
    /// # Errors
    /// Returns `TransportError::Config` if a boolean or numeric property has
    /// an invalid value, or if the resulting configuration fails
    /// [`validate`](Self::validate).
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self> {
        let prop = |key: &str| properties.get(key).map(|v| v.trim().to_string());

        let mut credentials = Credentials::new(
            prop("user").unwrap_or_default(),
            properties.get("password").cloned().unwrap_or_default(),
            prop("instanceId").unwrap_or_default(),
        );
        credentials.auth_host = prop("amOauthHost").filter(|host| !host.is_empty());

        let mut config = Self::new(prop("url").unwrap_or_default(), credentials);
        config.bypass_auth = parse_bool_property(properties, "bypassAuth")?.unwrap_or(false);
        config.logging.enabled =
            parse_bool_property(properties, "enableLogging")?.unwrap_or(false);

        if let Some(value) = parse_number_property(properties, "connectTimeoutMs")? {
            config.http.connect_timeout_ms = value;
        }
        if let Some(value) = parse_number_property(properties, "responseTimeoutMs")? {
            config.http.response_timeout_ms = value;
        }
        if let Some(value) = parse_number_property(properties, "maxAttempts")? {
            config.http.max_attempts = u32::try_from(value).map_err(|_| {
                TransportError::Config(format!("maxAttempts out of range: {value}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the transport cannot work with.
    ///
    /// # Errors
    /// Returns `TransportError::Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(TransportError::Config("endpoint must not be empty".into()));
        }
        if self.credentials.instance_id.trim().is_empty() {
            return Err(TransportError::Config("instance id must not be empty".into()));
        }
        if !self.bypass_auth
            && (self.credentials.client_id.trim().is_empty()
                || self.credentials.client_secret.is_empty())
        {
            return Err(TransportError::Config(
                "client id and client secret are required unless auth bypass is enabled".into(),
            ));
        }
        if self.http.max_attempts == 0 {
            return Err(TransportError::Config("max attempts must be at least 1".into()));
        }
        if self.http.connect_timeout_ms == 0 {
            return Err(TransportError::Config("connect timeout must be greater than zero".into()));
        }
        if self.http.response_timeout_ms == 0 {
            return Err(TransportError::Config("response timeout must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Strict boolean property: only `true`/`false` (case-insensitive).
fn parse_bool_property(properties: &HashMap<String, String>, key: &str) -> Result<Option<bool>> {
    match properties.get(key).map(|v| v.trim()) {
        None => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(value) if value.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(value) => Err(TransportError::Config(format!(
            "Invalid value for {key} property. Expected 'true' or 'false', but got: {value}"
        ))),
    }
}

fn parse_number_property(properties: &HashMap<String, String>, key: &str) -> Result<Option<u64>> {
    properties
        .get(key)
        .map(|value| {
            value.trim().parse::<u64>().map_err(|e| {
                TransportError::Config(format!("Invalid value for {key} property: {e}"))
            })
        })
        .transpose()
}
