//! Blocking facade used from plain threads
//!
//! The mock backend lives on its own runtime; the transport under test owns
//! another one, as it would inside a synchronous driver.

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use querylink_domain::TransportError;
use querylink_infra::{BlockingTransport, QueryTransport};
use support::{
    config_for, get_tables, hour_token_exchange, open_connection, prepare_and_execute, Sequence,
};
use tokio::runtime::Runtime;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn start_server(runtime: &Runtime, responder: ResponseTemplate) -> MockServer {
    runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(responder).mount(&server).await;
        server
    })
}

#[test]
fn blocking_send_returns_response_body() {
    let runtime = Runtime::new().unwrap();
    let server =
        start_server(&runtime, ResponseTemplate::new(200).set_body_string("blocking-ok"));

    let exchange = hour_token_exchange();
    let inner = QueryTransport::builder(config_for(&server))
        .credential_exchange(exchange.clone())
        .build()
        .unwrap();
    let transport = BlockingTransport::new(inner).unwrap();

    let body = transport.send(&open_connection("c-1")).unwrap();

    assert_eq!(body, b"blocking-ok");
    assert_eq!(exchange.call_count(), 1);
}

#[test]
fn blocking_send_surfaces_terminal_errors() {
    let runtime = Runtime::new().unwrap();
    let server = start_server(&runtime, ResponseTemplate::new(403).set_body_string("nope"));

    let inner = QueryTransport::builder(config_for(&server))
        .credential_exchange(hour_token_exchange())
        .build()
        .unwrap();
    let transport = BlockingTransport::new(inner).unwrap();

    let err = transport.send(&get_tables("c-1")).unwrap_err();
    assert!(matches!(err, TransportError::Client { status: 403, .. }));
}

#[test]
fn many_threads_share_one_blocking_transport() {
    let runtime = Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(Sequence::new(vec![
                ResponseTemplate::new(503),
                ResponseTemplate::new(200).set_body_string("ok"),
            ]))
            .mount(&server)
            .await;
        server
    });

    let exchange = hour_token_exchange();
    let inner = QueryTransport::builder(config_for(&server))
        .credential_exchange(exchange.clone())
        .build()
        .unwrap();
    let transport = BlockingTransport::new(inner).unwrap();

    std::thread::scope(|scope| {
        for i in 0..8 {
            let transport = &transport;
            scope.spawn(move || {
                let body = transport
                    .send(&prepare_and_execute(&format!("c-{i}"), "select 1"))
                    .unwrap();
                assert_eq!(body, b"ok");
            });
        }
    });

    assert_eq!(exchange.call_count(), 1);
}

#[test]
fn from_config_in_bypass_mode() {
    let runtime = Runtime::new().unwrap();
    let server = start_server(&runtime, ResponseTemplate::new(200));

    let mut config = config_for(&server);
    config.bypass_auth = true;
    let transport = BlockingTransport::from_config(config).unwrap();

    transport.send(&get_tables("c-1")).unwrap();
    assert!(transport.transport().token_manager().is_bypass());
}
