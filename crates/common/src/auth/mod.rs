//! Bearer-token lifecycle
//!
//! ```text
//! ┌──────────────────┐
//! │   TokenManager   │  freshness policy + single-flight refresh
//! └────────┬─────────┘
//!          │
//!          └──► CredentialExchange   (client-credentials grant, black box)
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `AccessToken` (value + absolute expiry) and `TokenGrant`
//! - **[`traits`]**: `CredentialExchange` port
//! - **[`token_manager`]**: `TokenManager`

pub mod token_manager;
pub mod traits;
pub mod types;

pub use token_manager::TokenManager;
pub use traits::CredentialExchange;
pub use types::{AccessToken, TokenGrant};
