//! Request introspection
//!
//! Decodes an outgoing payload once and extracts what the transport needs to
//! route it: the connection it belongs to and whether it executes a
//! statement.

use std::sync::Arc;

use querylink_domain::{ConnectionId, Result};
use tracing::debug;

use super::ports::RequestDecoder;
use super::request::{RequestClass, RpcRequest};

/// Routing facts about one outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestProfile {
    /// Wire name of the request type
    pub name: &'static str,
    pub class: RequestClass,
    pub connection_id: Option<ConnectionId>,
    pub opens_connection: bool,
}

impl RequestProfile {
    pub fn from_request(request: &RpcRequest) -> Self {
        Self {
            name: request.name(),
            class: request.class(),
            connection_id: extract_connection_id(request),
            opens_connection: request.opens_connection(),
        }
    }

    pub fn is_execute_class(&self) -> bool {
        self.class == RequestClass::Execute
    }
}

/// Introspector service
pub struct RequestIntrospector {
    decoder: Arc<dyn RequestDecoder>,
}

impl RequestIntrospector {
    pub fn new(decoder: Arc<dyn RequestDecoder>) -> Self {
        Self { decoder }
    }

    /// Decode `payload` and profile it.
    ///
    /// # Errors
    /// Propagates the decoder's `TransportError::Decode`.
    pub fn inspect(&self, payload: &[u8]) -> Result<RequestProfile> {
        let request = self.decoder.decode(payload)?;
        Ok(RequestProfile::from_request(&request))
    }
}

/// Connection identifier carried by the request, if any.
///
/// Requests without one (unknown types, some metadata lookups) are expected
/// and simply skip session affinity.
pub fn extract_connection_id(request: &RpcRequest) -> Option<ConnectionId> {
    let connection_id = request.connection_id().cloned();
    if connection_id.is_none() {
        debug!(request = request.name(), "Request carries no connection id");
    }
    connection_id
}

/// `true` for requests that execute a statement.
pub fn is_execute_class(request: &RpcRequest) -> bool {
    request.is_execute_class()
}

#[cfg(test)]
mod tests {
    use querylink_domain::TransportError;

    use super::*;
    use crate::rpc::request::{ConnectionScoped, MetadataLookup, StatementScoped};

    /// Decodes by looking the payload up in a fixed table.
    struct TableDecoder;

    impl RequestDecoder for TableDecoder {
        fn decode(&self, payload: &[u8]) -> Result<RpcRequest> {
            match payload {
                b"open" => Ok(RpcRequest::OpenConnection(ConnectionScoped {
                    connection_id: ConnectionId::from("c-1"),
                })),
                b"batch" => Ok(RpcRequest::ExecuteBatch(StatementScoped {
                    connection_id: ConnectionId::from("c-2"),
                    statement_id: 1,
                })),
                b"catalogs" => Ok(RpcRequest::GetCatalogs(MetadataLookup::default())),
                _ => Err(TransportError::Decode("unknown payload".into())),
            }
        }
    }

    fn introspector() -> RequestIntrospector {
        RequestIntrospector::new(Arc::new(TableDecoder))
    }

    #[test]
    fn profiles_open_connection() {
        let profile = introspector().inspect(b"open").unwrap();

        assert!(profile.opens_connection);
        assert!(!profile.is_execute_class());
        assert_eq!(profile.class, RequestClass::Connection);
        assert_eq!(profile.connection_id, Some(ConnectionId::from("c-1")));
    }

    #[test]
    fn profiles_batch_execution() {
        let profile = introspector().inspect(b"batch").unwrap();

        assert!(profile.is_execute_class());
        assert_eq!(profile.name, "executeBatch");
        assert_eq!(profile.connection_id, Some(ConnectionId::from("c-2")));
    }

    #[test]
    fn missing_connection_id_is_not_an_error() {
        let profile = introspector().inspect(b"catalogs").unwrap();

        assert_eq!(profile.connection_id, None);
        assert_eq!(profile.class, RequestClass::Metadata);
    }

    #[test]
    fn decode_failure_propagates() {
        let err = introspector().inspect(b"garbage").unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[test]
    fn free_functions_agree_with_request_methods() {
        let request = RpcRequest::Other;

        assert_eq!(extract_connection_id(&request), None);
        assert!(!is_execute_class(&request));
    }
}
