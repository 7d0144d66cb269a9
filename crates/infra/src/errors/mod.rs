//! Error conversions for infrastructure dependencies

mod conversions;

pub use conversions::InfraError;
pub(crate) use conversions::{auth_error_from_http, describe_http_error};
