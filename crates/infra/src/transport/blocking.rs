//! Synchronous facade over [`QueryTransport`]

use querylink_domain::{Result, TransportConfig, TransportError};
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};

use super::executor::QueryTransport;

/// Blocking transport for callers without an async runtime.
///
/// Owns a multi-thread tokio runtime; `send` blocks the calling thread until
/// the call reaches a terminal outcome. Any number of threads may call `send`
/// concurrently. Must not be used, or dropped, from inside an async context.
pub struct BlockingTransport {
    runtime: Runtime,
    inner: QueryTransport,
}

impl BlockingTransport {
    /// Wrap an existing transport.
    ///
    /// # Errors
    /// Returns `TransportError::Internal` if the runtime cannot be started.
    pub fn new(inner: QueryTransport) -> Result<Self> {
        let runtime = RuntimeBuilder::new_multi_thread()
            .enable_all()
            .thread_name("querylink-transport")
            .build()
            .map_err(|e| TransportError::Internal(format!("failed to start runtime: {e}")))?;
        Ok(Self { runtime, inner })
    }

    /// # Errors
    /// Same as [`QueryTransport::from_config`], plus runtime start failures.
    pub fn from_config(config: TransportConfig) -> Result<Self> {
        Self::new(QueryTransport::from_config(config)?)
    }

    /// Send one request payload and return the response payload.
    ///
    /// # Errors
    /// See [`QueryTransport::send`].
    pub fn send(&self, payload: &[u8]) -> Result<Vec<u8>> {
        self.runtime.block_on(self.inner.send(payload))
    }

    pub fn transport(&self) -> &QueryTransport {
        &self.inner
    }
}
