//! Session affinity
//!
//! Ties a logical connection to the sticky-routing token the backend last
//! assigned to it, so follow-up requests reach the same backend instance.

pub mod store;

pub use store::SessionAffinityStore;
