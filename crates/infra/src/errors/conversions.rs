//! Conversions from external infrastructure errors into domain errors.

use querylink_domain::{AuthError, TransportError};
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TransportError);

impl From<InfraError> for TransportError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TransportError> for InfraError {
    fn from(value: TransportError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
pub(crate) trait IntoTransportError {
    fn into_transport(self) -> TransportError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError */
/* -------------------------------------------------------------------------- */

/// Short description of a transport-level failure.
pub(crate) fn describe_http_error(err: &HttpError) -> String {
    if err.is_timeout() {
        return "HTTP request timed out".into();
    }
    if err.is_connect() {
        return format!("HTTP connection failure: {err}");
    }
    if err.is_body() || err.is_decode() {
        return format!("failed to read HTTP response body: {err}");
    }
    err.to_string()
}

impl IntoTransportError for HttpError {
    fn into_transport(self) -> TransportError {
        if self.is_builder() {
            return TransportError::Config(format!("invalid HTTP request: {self}"));
        }

        // Statuses are classified from the full response, never from here
        TransportError::Internal(describe_http_error(&self))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_transport())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AuthError */
/* -------------------------------------------------------------------------- */

/// Credential-exchange failures that never produced a status code.
pub(crate) fn auth_error_from_http(err: &HttpError) -> AuthError {
    if err.is_decode() {
        return AuthError::MalformedResponse(err.to_string());
    }
    AuthError::Network(describe_http_error(err))
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn invalid_url_maps_to_config_error() {
        let client = Client::builder().no_proxy().build().unwrap();
        let err = client.get("not a url").send().await.unwrap_err();

        let mapped: TransportError = InfraError::from(err).into();

        assert!(matches!(mapped, TransportError::Config(_)));
    }

    #[tokio::test]
    async fn status_error_is_not_reported_with_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::FORBIDDEN))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let err = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: TransportError = InfraError::from(err).into();

        assert!(matches!(mapped, TransportError::Internal(_)));
        assert_eq!(mapped.status(), None);
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_auth_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let err = client.get(format!("http://{addr}")).send().await.unwrap_err();

        match auth_error_from_http(&err) {
            AuthError::Network(msg) => assert!(msg.contains("connection")),
            other => panic!("expected network error, got {other:?}"),
        }
    }
}
