//! RPC request model, decoding port and introspection

pub mod introspector;
pub mod ports;
pub mod request;

pub use introspector::{
    extract_connection_id, is_execute_class, RequestIntrospector, RequestProfile,
};
pub use ports::RequestDecoder;
pub use request::{
    ConnectionScoped, ExecuteStatement, MetadataLookup, RequestClass, RpcRequest,
    StatementHandle, StatementScoped,
};
