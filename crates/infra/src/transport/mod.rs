//! Authenticated, session-aware RPC transport
//!
//! ```text
//! send(bytes)
//!   ├─► RequestIntrospector   decode, connection id, execute class
//!   ├─► SessionAffinityStore  sticky session for the connection
//!   ├─► TokenManager          bearer token, refreshed near expiry
//!   └─► HttpClient            POST, retried on 503 / transport failure
//! ```

pub mod blocking;
pub mod executor;
pub mod outcome;
pub mod retry;

pub use blocking::BlockingTransport;
pub use executor::{QueryTransport, QueryTransportBuilder};
pub use outcome::ResponseOutcome;
pub use retry::RetryPolicy;
