//! Mock implementations of common traits

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use querylink_domain::{AuthError, Credentials};

use crate::auth::{CredentialExchange, TokenGrant};

type ExchangeResult = Result<TokenGrant, AuthError>;

/// Scriptable credential exchange.
///
/// Queued responses are served first, in order; once the queue is empty every
/// call gets the fallback response.
pub struct MockCredentialExchange {
    queued: Mutex<VecDeque<ExchangeResult>>,
    fallback: ExchangeResult,
    calls: AtomicUsize,
    last_credentials: Mutex<Option<Credentials>>,
    delay: Duration,
}

impl MockCredentialExchange {
    /// Always issue `token` valid for `expires_in`.
    pub fn issuing(token: impl Into<String>, expires_in: Duration) -> Self {
        Self::with_fallback(Ok(TokenGrant::new(token, expires_in)))
    }

    /// Always fail with `error`.
    pub fn failing(error: AuthError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: ExchangeResult) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            last_credentials: Mutex::new(None),
            delay: Duration::ZERO,
        }
    }

    /// Serve `response` before falling back.
    #[must_use]
    pub fn then(self, response: ExchangeResult) -> Self {
        if let Ok(mut queued) = self.queued.lock() {
            queued.push_back(response);
        }
        self
    }

    /// Sleep before answering, to widen race windows in concurrency tests.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of exchanges performed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Credentials passed to the most recent exchange.
    pub fn last_credentials(&self) -> Option<Credentials> {
        self.last_credentials.lock().ok().and_then(|last| last.clone())
    }
}

#[async_trait]
impl CredentialExchange for MockCredentialExchange {
    async fn exchange(&self, credentials: &Credentials) -> Result<TokenGrant, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_credentials.lock() {
            *last = Some(credentials.clone());
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let queued = self.queued.lock().ok().and_then(|mut queued| queued.pop_front());
        queued.unwrap_or_else(|| self.fallback.clone())
    }
}
