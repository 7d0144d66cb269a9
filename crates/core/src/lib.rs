//! # QueryLink Core
//!
//! Transport-facing request logic with no infrastructure dependencies.
//!
//! This crate contains:
//! - The closed RPC request model the transport routes on
//! - The `RequestDecoder` port
//! - Request introspection (connection id, execute classification)
//!
//! ## Architecture Principles
//! - Only depends on `querylink-domain`
//! - No HTTP or runtime code
//! - Decoding plugged in via traits

pub mod rpc;

pub use rpc::{
    extract_connection_id, is_execute_class, RequestClass, RequestDecoder, RequestIntrospector,
    RequestProfile, RpcRequest,
};
