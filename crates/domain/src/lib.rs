//! # QueryLink Domain
//!
//! Domain types shared by every QueryLink crate.
//!
//! This crate contains:
//! - The transport error taxonomy and Result definition
//! - Configuration structures
//! - Protocol constants (header names, endpoint paths, defaults)
//! - Value types (`ConnectionId`, `SessionToken`)
//!
//! ## Architecture
//! - No dependencies on other QueryLink crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
