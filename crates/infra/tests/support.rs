//! Shared fixtures for transport integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use querylink_common::testing::MockCredentialExchange;
use querylink_domain::{Credentials, TransportConfig};
use querylink_infra::QueryTransport;
use serde_json::json;
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const INSTANCE_ID: &str = "bgmj_stg";
pub const TOKEN: &str = "tok-1";

/// One-hour token from a mock exchange.
pub fn hour_token_exchange() -> Arc<MockCredentialExchange> {
    Arc::new(MockCredentialExchange::issuing(TOKEN, Duration::from_secs(3600)))
}

pub fn config_for(server: &MockServer) -> TransportConfig {
    let mut config = TransportConfig::new(
        format!("{}/query", server.uri()),
        Credentials::new("client-id", "client-secret", INSTANCE_ID),
    );
    config.http.connect_timeout_ms = 2_000;
    config.http.response_timeout_ms = 5_000;
    config
}

/// Transport against `server` with tokens from `exchange`.
pub fn transport_for(server: &MockServer, exchange: Arc<MockCredentialExchange>) -> QueryTransport {
    QueryTransport::builder(config_for(server))
        .credential_exchange(exchange)
        .build()
        .expect("transport should build")
}

pub fn open_connection(connection_id: &str) -> Vec<u8> {
    encode(json!({ "request": "openConnection", "connectionId": connection_id, "info": {} }))
}

pub fn prepare_and_execute(connection_id: &str, sql: &str) -> Vec<u8> {
    encode(json!({
        "request": "prepareAndExecute",
        "connectionId": connection_id,
        "statementId": 1,
        "sql": sql,
        "maxRowsTotal": -1
    }))
}

pub fn get_tables(connection_id: &str) -> Vec<u8> {
    encode(json!({ "request": "getTables", "connectionId": connection_id }))
}

fn encode(value: serde_json::Value) -> Vec<u8> {
    value.to_string().into_bytes()
}

/// Header value of the `index`-th request received by `server`.
pub async fn received_header(server: &MockServer, index: usize, name: &str) -> Option<String> {
    let requests = server.received_requests().await.expect("request recording enabled");
    requests[index].headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

pub async fn received_count(server: &MockServer) -> usize {
    server.received_requests().await.expect("request recording enabled").len()
}

/// Serves the given responses in order, repeating the last one.
pub struct Sequence {
    responses: Vec<ResponseTemplate>,
    next: AtomicUsize,
}

impl Sequence {
    pub fn new(responses: Vec<ResponseTemplate>) -> Self {
        assert!(!responses.is_empty(), "sequence needs at least one response");
        Self { responses, next: AtomicUsize::new(0) }
    }

    pub fn statuses(statuses: &[u16]) -> Self {
        Self::new(statuses.iter().map(|status| ResponseTemplate::new(*status)).collect())
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let index = self.next.fetch_add(1, Ordering::SeqCst).min(self.responses.len() - 1);
        self.responses[index].clone()
    }
}
