//! Configuration loading
//!
//! Loads a [`TransportConfig`](querylink_domain::TransportConfig) from
//! environment variables or files. Driver-style property maps are handled by
//! `TransportConfig::from_properties` in the domain crate.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
