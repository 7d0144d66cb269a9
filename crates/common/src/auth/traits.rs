//! Credential exchange port
//!
//! Abstracts the authentication provider so the token manager can be driven
//! by the real HTTP exchange or by test doubles.

use async_trait::async_trait;
use querylink_domain::{AuthError, Credentials};

use super::types::TokenGrant;

/// Black-box client-credentials exchange.
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    /// Trade client credentials for an access token scoped to
    /// `credentials.instance_id`.
    ///
    /// # Errors
    /// Returns `AuthError` if the provider rejects the credentials, cannot be
    /// reached, or answers with a malformed body.
    async fn exchange(&self, credentials: &Credentials) -> Result<TokenGrant, AuthError>;
}
