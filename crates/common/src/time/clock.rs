//! Wall-clock abstraction for testability
//!
//! Token expiry is an absolute instant, so the clock reports UTC wall time
//! rather than a monotonic `Instant`.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use querylink_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(90));
//! assert_eq!((clock.now() - start).num_seconds(), 90);
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync + 'static {
    /// Current UTC wall time
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock implementation for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share the same elapsed offset.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: DateTime<Utc>,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Create a new mock clock starting at the current time
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Create a mock clock frozen at `start`
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self { start, elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    /// Advance the mock clock by a duration
    pub fn advance(&self, duration: Duration) {
        if let Ok(mut elapsed) = self.elapsed.lock() {
            *elapsed += duration;
        }
    }

    fn elapsed(&self) -> Duration {
        self.elapsed.lock().map(|elapsed| *elapsed).unwrap_or_default()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        let offset =
            chrono::Duration::from_std(self.elapsed()).unwrap_or_else(|_| chrono::Duration::zero());
        self.start + offset
    }
}
