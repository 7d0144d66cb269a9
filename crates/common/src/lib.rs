//! Shared runtime building blocks for QueryLink crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `runtime`: token lifecycle (`auth`), session affinity, clocks
//! - `test-utils`: mock credential exchange and clock doubles

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod affinity;
#[cfg(feature = "runtime")]
pub mod auth;
#[cfg(feature = "runtime")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "runtime")))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use affinity::SessionAffinityStore;
#[cfg(feature = "runtime")]
pub use auth::{AccessToken, CredentialExchange, TokenGrant, TokenManager};
#[cfg(feature = "runtime")]
pub use time::{Clock, MockClock, SystemClock};
