//! Credential exchange over HTTP

pub mod account_manager;

pub use account_manager::AccountManagerExchange;
