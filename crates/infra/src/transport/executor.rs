//! Transport executor
//!
//! One `send` is one logical call: decode the payload, attach the bearer
//! token and routing headers, POST it, and retry transient failures up to
//! the attempt bound. Successful responses update session affinity.

use std::sync::Arc;

use bytes::Bytes;
use querylink_common::affinity::SessionAffinityStore;
use querylink_common::auth::{CredentialExchange, TokenManager};
use querylink_common::time::Clock;
use querylink_core::rpc::{RequestDecoder, RequestIntrospector, RequestProfile};
use querylink_domain::constants::{
    CLIENT_VERSION, CLIENT_VERSION_HEADER, INSTANCE_ID_HEADER, REQUEST_TYPE_EXECUTE,
    REQUEST_TYPE_HEADER, SESSION_ID_HEADER,
};
use querylink_domain::{Result, SessionToken, TransportConfig, TransportError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use tracing::{debug, warn};
use url::Url;

use super::outcome::ResponseOutcome;
use super::retry::RetryPolicy;
use crate::auth::AccountManagerExchange;
use crate::codec::JsonRequestDecoder;
use crate::http::HttpClient;

/// Authenticated, session-aware transport for RPC payloads.
///
/// Safe to share across tasks (`Arc<QueryTransport>`); the token manager and
/// the affinity store are the only mutable state and both are
/// concurrency-safe.
pub struct QueryTransport {
    endpoint: Url,
    http_client: HttpClient,
    tokens: Arc<TokenManager>,
    affinity: SessionAffinityStore,
    introspector: RequestIntrospector,
    retry: RetryPolicy,
}

impl QueryTransport {
    /// Start building a transport for `config`.
    pub fn builder(config: TransportConfig) -> QueryTransportBuilder {
        QueryTransportBuilder::new(config)
    }

    /// Transport with the default collaborators: HTTP credential exchange
    /// (or the bypass token), a fresh affinity store, JSON decoding.
    ///
    /// # Errors
    /// Returns `TransportError::Config` if the configuration is invalid.
    pub fn from_config(config: TransportConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Send one request payload and return the response payload unchanged.
    ///
    /// # Errors
    /// - `Decode` if the payload is not a request; nothing is sent
    /// - `Auth` if a token refresh was needed and failed; nothing is sent
    /// - `Client`, `Server`, `UnexpectedStatus` for terminal HTTP outcomes
    /// - `RetriesExhausted` once every attempt hit a 503 or a transport
    ///   failure
    pub async fn send(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let profile = self.introspector.inspect(payload)?;
        let session = profile.connection_id.as_ref().and_then(|id| self.affinity.get(id));
        let token = self.tokens.ensure_valid_token().await?;

        debug!(
            request = profile.name,
            connection_id = ?profile.connection_id,
            sticky = session.is_some(),
            "Sending request"
        );

        let body = Bytes::copy_from_slice(payload);
        let max_attempts = self.retry.max_attempts();
        let mut last_failure = String::new();

        for attempt in 1..=max_attempts {
            let request = self.build_request(&token, session.as_ref(), &profile, body.clone());

            let outcome = match self.http_client.execute(request).await {
                Ok(response) => ResponseOutcome::from_response(response).await,
                Err(err) => ResponseOutcome::from_error(err)?,
            };

            match outcome {
                ResponseOutcome::Success { body, session } => {
                    debug!(
                        request = profile.name,
                        attempt,
                        bytes = body.len(),
                        "Request succeeded"
                    );
                    self.record_session(&profile, session);
                    return Ok(body.to_vec());
                }
                ResponseOutcome::Retryable(reason) => {
                    warn!(
                        request = profile.name,
                        attempt,
                        max_attempts,
                        reason = %reason,
                        "Transient failure"
                    );
                    last_failure = reason;
                    if attempt < max_attempts {
                        self.retry.pause(attempt).await;
                    }
                }
                terminal => {
                    return Err(terminal.into_error().unwrap_or_else(|| {
                        TransportError::Internal("unclassified response outcome".into())
                    }));
                }
            }
        }

        Err(TransportError::RetriesExhausted { attempts: max_attempts, last_failure })
    }

    /// Shared session-affinity store.
    pub fn affinity_store(&self) -> &SessionAffinityStore {
        &self.affinity
    }

    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_request(
        &self,
        token: &str,
        session: Option<&SessionToken>,
        profile: &RequestProfile,
        body: Bytes,
    ) -> RequestBuilder {
        let mut request = self
            .http_client
            .request(Method::POST, self.endpoint.clone())
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(body);

        if let Some(session) = session {
            request = request.header(SESSION_ID_HEADER, session.as_str());
        }
        if profile.is_execute_class() {
            request = request.header(REQUEST_TYPE_HEADER, REQUEST_TYPE_EXECUTE);
        }
        request
    }

    fn record_session(&self, profile: &RequestProfile, session: Option<SessionToken>) {
        match (&profile.connection_id, session) {
            (Some(connection_id), Some(session)) => {
                let previous = self.affinity.put(connection_id.clone(), session);
                debug!(
                    connection_id = %connection_id,
                    replaced = previous.is_some(),
                    "Session affinity updated"
                );
            }
            (_, None) if profile.opens_connection => {
                warn!(
                    connection_id = ?profile.connection_id,
                    "Open-connection response carried no session header"
                );
            }
            _ => {}
        }
    }
}

/// Builder for [`QueryTransport`].
pub struct QueryTransportBuilder {
    config: TransportConfig,
    exchange: Option<Arc<dyn CredentialExchange>>,
    token_manager: Option<Arc<TokenManager>>,
    affinity: Option<SessionAffinityStore>,
    decoder: Option<Arc<dyn RequestDecoder>>,
    clock: Option<Arc<dyn Clock>>,
}

impl QueryTransportBuilder {
    fn new(config: TransportConfig) -> Self {
        Self {
            config,
            exchange: None,
            token_manager: None,
            affinity: None,
            decoder: None,
            clock: None,
        }
    }

    /// Credential exchange used when no token manager is supplied.
    pub fn credential_exchange(mut self, exchange: Arc<dyn CredentialExchange>) -> Self {
        self.exchange = Some(exchange);
        self
    }

    /// Share an existing token manager (takes precedence over
    /// `credential_exchange` and `clock`).
    pub fn token_manager(mut self, tokens: Arc<TokenManager>) -> Self {
        self.token_manager = Some(tokens);
        self
    }

    /// Share an affinity store with other transports.
    pub fn affinity_store(mut self, store: SessionAffinityStore) -> Self {
        self.affinity = Some(store);
        self
    }

    /// Request decoder (default: [`JsonRequestDecoder`]). Required for
    /// payloads in Avatica's protobuf serialization.
    pub fn decoder(mut self, decoder: Arc<dyn RequestDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Clock for the token manager built by this builder.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// # Errors
    /// Returns `TransportError::Config` for an invalid configuration,
    /// endpoint URL or instance id header value.
    pub fn build(self) -> Result<QueryTransport> {
        let config = self.config;
        config.validate()?;

        let endpoint = Url::parse(config.endpoint.trim()).map_err(|e| {
            TransportError::Config(format!("invalid endpoint '{}': {e}", config.endpoint))
        })?;

        let http_client = HttpClient::builder()
            .connect_timeout(config.http.connect_timeout())
            .timeout(config.http.response_timeout())
            .user_agent(CLIENT_VERSION)
            .default_headers(default_headers(&config)?)
            .build()?;

        let tokens = match self.token_manager {
            Some(tokens) => tokens,
            None => {
                let manager = if config.bypass_auth {
                    TokenManager::bypass(config.credentials.clone())
                } else {
                    let exchange: Arc<dyn CredentialExchange> = match self.exchange {
                        Some(exchange) => exchange,
                        None => Arc::new(AccountManagerExchange::from_config(&config.http)?),
                    };
                    TokenManager::new(exchange, config.credentials.clone())
                };
                let manager = match self.clock {
                    Some(clock) => manager.with_clock(clock),
                    None => manager,
                };
                Arc::new(manager)
            }
        };

        let decoder = self.decoder.unwrap_or_else(|| Arc::new(JsonRequestDecoder::new()));

        debug!(endpoint = %endpoint, bypass = tokens.is_bypass(), "Transport configured");

        Ok(QueryTransport {
            endpoint,
            http_client,
            tokens,
            affinity: self.affinity.unwrap_or_default(),
            introspector: RequestIntrospector::new(decoder),
            retry: RetryPolicy::from_config(&config.http),
        })
    }
}

/// Headers sent on every request: instance id and client version.
fn default_headers(config: &TransportConfig) -> Result<HeaderMap> {
    let instance_name = HeaderName::from_bytes(INSTANCE_ID_HEADER.as_bytes())
        .map_err(|e| TransportError::Internal(format!("invalid header name: {e}")))?;
    let version_name = HeaderName::from_bytes(CLIENT_VERSION_HEADER.as_bytes())
        .map_err(|e| TransportError::Internal(format!("invalid header name: {e}")))?;
    let instance_id = HeaderValue::from_str(config.credentials.instance_id.trim())
        .map_err(|e| TransportError::Config(format!("invalid instance id: {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(instance_name, instance_id);
    headers.insert(version_name, HeaderValue::from_static(CLIENT_VERSION));
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use querylink_domain::Credentials;

    use super::*;

    fn config(endpoint: &str) -> TransportConfig {
        let mut config =
            TransportConfig::new(endpoint, Credentials::new("id", "secret", "bgmj_stg"));
        config.bypass_auth = true;
        config
    }

    #[test]
    fn rejects_unparseable_endpoint() {
        let err = QueryTransport::from_config(config("not a url")).err().unwrap();
        assert!(matches!(err, TransportError::Config(msg) if msg.contains("invalid endpoint")));
    }

    #[test]
    fn rejects_instance_id_that_is_not_a_header_value() {
        let mut config = config("http://localhost:8765");
        config.credentials.instance_id = "bad\nvalue".into();

        let err = QueryTransport::from_config(config).err().unwrap();
        assert!(matches!(err, TransportError::Config(msg) if msg.contains("instance id")));
    }

    #[test]
    fn bypass_config_builds_bypass_token_manager() {
        let transport = QueryTransport::from_config(config("http://localhost:8765/")).unwrap();

        assert!(transport.token_manager().is_bypass());
        assert_eq!(transport.endpoint().as_str(), "http://localhost:8765/");
        assert!(transport.affinity_store().is_empty());
    }

    #[test]
    fn injected_affinity_store_is_shared() {
        let store = SessionAffinityStore::new();
        let transport = QueryTransport::builder(config("http://localhost:8765"))
            .affinity_store(store.clone())
            .build()
            .unwrap();

        store.put("c-1".into(), SessionToken::from("s-1"));
        assert_eq!(transport.affinity_store().get(&"c-1".into()), Some(SessionToken::from("s-1")));
    }
}
