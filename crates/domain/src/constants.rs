//! Protocol constants
//!
//! Centralized location for header names, endpoint paths and defaults shared
//! by every layer of the transport.

use std::time::Duration;

// Outgoing request headers
pub const INSTANCE_ID_HEADER: &str = "InstanceId";
pub const CLIENT_VERSION_HEADER: &str = "X-Client-Version";
pub const REQUEST_TYPE_HEADER: &str = "X-Request-Type";
pub const REQUEST_TYPE_EXECUTE: &str = "execute";

/// Sticky-routing header. Sent on requests when a session token is known and
/// read back from successful responses.
pub const SESSION_ID_HEADER: &str = "X-Session-Id";

/// Value of the client-version header.
pub const CLIENT_VERSION: &str = concat!("querylink/", env!("CARGO_PKG_VERSION"));

// Credential exchange
pub const DEFAULT_AUTH_HOST: &str = "https://account.demandware.com";
pub const TOKEN_ENDPOINT_PATH: &str = "/dwsso/oauth2/access_token";
pub const TOKEN_SCOPE_PRODUCT: &str = "SALESFORCE_COMMERCE_API";
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

// Token lifecycle
/// Tokens are treated as unusable this long before their recorded expiry.
pub const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(5 * 60);

/// Sentinel token handed out in bypass mode.
pub const BYPASS_TOKEN: &str = "querylink-bypass-token";

/// Validity window of the bypass sentinel token (one day).
pub const BYPASS_TOKEN_VALIDITY: Duration = Duration::from_secs(24 * 60 * 60);

// HTTP defaults
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 0;
