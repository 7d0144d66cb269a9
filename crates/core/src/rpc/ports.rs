//! Port interfaces for request decoding

use querylink_domain::Result;

use super::request::RpcRequest;

/// Turns an opaque request payload into a structured [`RpcRequest`].
///
/// The payload itself is never modified; decoding only serves routing.
///
/// The transport decodes Avatica's JSON serialization unless told otherwise.
/// Drivers using the protobuf serialization must supply their own decoder,
/// otherwise every send fails with `TransportError::Decode`.
pub trait RequestDecoder: Send + Sync {
    /// Decode a serialized request.
    ///
    /// Implementations return `TransportError::Decode` for payloads that are
    /// not a request at all. A well-formed request of an unrecognized type is
    /// not an error and decodes to [`RpcRequest::Other`].
    fn decode(&self, payload: &[u8]) -> Result<RpcRequest>;
}
