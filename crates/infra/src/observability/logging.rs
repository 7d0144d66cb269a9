//! Logging initialization
//!
//! Logging is off unless the configuration enables it. When enabled, a
//! `tracing-subscriber` fmt layer is installed with `RUST_LOG` as the filter
//! if set, otherwise debug output for the QueryLink crates only.

use querylink_domain::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_DIRECTIVES: &str =
    "querylink_domain=debug,querylink_common=debug,querylink_core=debug,querylink_infra=debug";

/// Install the global subscriber described by `config`.
///
/// Returns `true` if this call installed it. A disabled config, or a process
/// that already has a global subscriber, leaves things as they are.
pub fn init_logging(config: &LoggingConfig) -> bool {
    if !config.enabled {
        return false;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json()).try_init().is_ok()
    } else {
        registry.with(fmt::layer()).try_init().is_ok()
    };

    if installed {
        tracing::debug!(json = config.json, "Logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_installs_nothing() {
        assert!(!init_logging(&LoggingConfig { enabled: false, json: true }));
    }

    #[test]
    fn second_initialization_is_a_no_op() {
        let config = LoggingConfig { enabled: true, json: false };

        // Another test may have installed the subscriber first.
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }
}
