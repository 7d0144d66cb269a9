//! # QueryLink Infrastructure
//!
//! I/O implementations behind the core ports.
//!
//! This crate contains:
//! - The pooled HTTP client and reqwest error conversions
//! - The credential exchange over HTTP
//! - The transport executor and its blocking facade
//! - The JSON request decoder
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements traits defined in `querylink-core` and `querylink-common`
//! - Contains all "impure" code (network, files, environment)

pub mod auth;
pub mod codec;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod transport;

// Re-export commonly used items
pub use auth::AccountManagerExchange;
pub use codec::JsonRequestDecoder;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_logging;
pub use transport::{BlockingTransport, QueryTransport, QueryTransportBuilder, ResponseOutcome};
