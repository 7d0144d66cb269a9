//! Decoder for the JSON request serialization

use querylink_core::rpc::{RequestDecoder, RpcRequest};
use querylink_domain::{Result, TransportError};

/// Decodes JSON request payloads (`{"request": "<type>", ...}`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRequestDecoder;

impl JsonRequestDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl RequestDecoder for JsonRequestDecoder {
    fn decode(&self, payload: &[u8]) -> Result<RpcRequest> {
        serde_json::from_slice(payload).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
