//! Token manager with on-demand refresh
//!
//! Manages the bearer-token lifecycle for one transport instance:
//! - Lazy fetch on first use
//! - Refresh once the token is within the safety margin of its expiry
//! - Single-flight refresh across concurrent senders
//! - Bypass mode with a fixed sentinel token for integration tests

use std::sync::Arc;
use std::time::Duration;

use querylink_domain::constants::{BYPASS_TOKEN, BYPASS_TOKEN_VALIDITY, TOKEN_REFRESH_MARGIN};
use querylink_domain::{AuthError, Credentials};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::traits::CredentialExchange;
use super::types::{AccessToken, TokenGrant};
use crate::time::{Clock, SystemClock};

/// Where new tokens come from.
enum TokenSource {
    Exchange(Arc<dyn CredentialExchange>),
    /// Sentinel token, no credential exchange. Not for production use.
    Bypass,
}

/// Token manager shared by every sender of one transport.
///
/// Readers take a shared lock on the current token; refreshes are serialized
/// through a separate gate so a slow credential exchange never blocks readers
/// of a still-valid token, and waiters re-check freshness before fetching
/// again.
pub struct TokenManager {
    source: TokenSource,
    credentials: Credentials,
    current: RwLock<Option<AccessToken>>,
    refresh_gate: Mutex<()>,
    refresh_margin: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    /// Create a token manager backed by a credential exchange.
    ///
    /// # Arguments
    /// * `exchange` - Provider that trades credentials for tokens
    /// * `credentials` - Client id/secret and target instance
    #[must_use]
    pub fn new(exchange: Arc<dyn CredentialExchange>, credentials: Credentials) -> Self {
        Self::with_source(TokenSource::Exchange(exchange), credentials)
    }

    /// Create a token manager that hands out a fixed sentinel token with a
    /// long validity window and never contacts the credential exchange.
    #[must_use]
    pub fn bypass(credentials: Credentials) -> Self {
        warn!("Token manager running in bypass mode; credential exchange is disabled");
        Self::with_source(TokenSource::Bypass, credentials)
    }

    fn with_source(source: TokenSource, credentials: Credentials) -> Self {
        Self {
            source,
            credentials,
            current: RwLock::new(None),
            refresh_gate: Mutex::new(()),
            refresh_margin: TOKEN_REFRESH_MARGIN,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock (tests).
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the safety margin before expiry (default: 5 minutes).
    #[must_use]
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// Return a usable bearer token, refreshing it first if needed.
    ///
    /// # Errors
    /// Returns the credential exchange's `AuthError` if a refresh was needed
    /// and failed. The previously stored token is left untouched.
    pub async fn ensure_valid_token(&self) -> Result<String, AuthError> {
        if let Some(value) = self.usable_token().await {
            return Ok(value);
        }

        let _gate = self.refresh_gate.lock().await;

        // Another sender may have refreshed while we waited for the gate
        if let Some(value) = self.usable_token().await {
            debug!("Token refreshed by a concurrent sender");
            return Ok(value);
        }

        self.refresh_locked().await
    }

    /// Fetch a new token unconditionally.
    ///
    /// # Errors
    /// Returns the credential exchange's `AuthError` on failure.
    pub async fn force_refresh(&self) -> Result<String, AuthError> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_locked().await
    }

    /// Drop the current token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        *self.current.write().await = None;
        debug!("Cached token invalidated");
    }

    /// Current token, usable or not (no refresh).
    pub async fn current_token(&self) -> Option<AccessToken> {
        self.current.read().await.clone()
    }

    /// `true` if the next `ensure_valid_token` call would refresh.
    pub async fn needs_refresh(&self) -> bool {
        self.usable_token().await.is_none()
    }

    #[must_use]
    pub fn is_bypass(&self) -> bool {
        matches!(self.source, TokenSource::Bypass)
    }

    #[must_use]
    pub fn refresh_margin(&self) -> Duration {
        self.refresh_margin
    }

    async fn usable_token(&self) -> Option<String> {
        let now = self.clock.now();
        let current = self.current.read().await;
        current
            .as_ref()
            .filter(|token| token.is_usable(now, self.refresh_margin))
            .map(|token| token.value().to_string())
    }

    /// Caller must hold `refresh_gate`.
    async fn refresh_locked(&self) -> Result<String, AuthError> {
        let grant = match &self.source {
            TokenSource::Exchange(exchange) => {
                debug!(instance_id = %self.credentials.instance_id, "Refreshing access token");
                exchange
                    .exchange(&self.credentials)
                    .await
                    .inspect_err(|err| warn!(error = %err, "Access token refresh failed"))?
            }
            TokenSource::Bypass => TokenGrant::new(BYPASS_TOKEN, BYPASS_TOKEN_VALIDITY),
        };

        let token = AccessToken::from_grant(grant, self.clock.now()).ok_or_else(|| {
            warn!("Credential exchange returned an out-of-range expiry");
            AuthError::MalformedResponse("expires_in out of range".into())
        })?;
        let value = token.value().to_string();
        info!(
            expires_in_secs = token.seconds_until_expiry(self.clock.now()),
            "Access token refreshed"
        );

        *self.current.write().await = Some(token);
        Ok(value)
    }
}
