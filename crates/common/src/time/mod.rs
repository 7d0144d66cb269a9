//! Time abstractions
//!
//! - **[`clock`]**: Real and mock wall clocks used for token expiry

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
