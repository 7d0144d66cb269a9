//! Testing utilities and helpers
//!
//! - **[`mocks`]**: Mock implementations of common traits
//! - Clock doubles are re-exported from [`crate::time`]

pub mod mocks;

pub use mocks::MockCredentialExchange;

pub use crate::time::MockClock;
