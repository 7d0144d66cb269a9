//! Configuration loader
//!
//! Loads the transport configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `QUERYLINK_ENDPOINT`: Backend query-service URL (required)
//! - `QUERYLINK_INSTANCE_ID`: Target instance id (required)
//! - `QUERYLINK_CLIENT_ID` / `QUERYLINK_CLIENT_SECRET`: Client credentials
//! - `QUERYLINK_AUTH_HOST`: Credential-exchange host override
//! - `QUERYLINK_BYPASS_AUTH`: Use the sentinel token (true/false)
//! - `QUERYLINK_CONNECT_TIMEOUT_MS`: Connect timeout in milliseconds
//! - `QUERYLINK_RESPONSE_TIMEOUT_MS`: Response timeout in milliseconds
//! - `QUERYLINK_MAX_ATTEMPTS`: Physical attempts per call
//! - `QUERYLINK_RETRY_BACKOFF_MS`: Base delay between attempts
//! - `QUERYLINK_LOG_ENABLED` / `QUERYLINK_LOG_JSON`: Logging switches
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./querylink.json` or `./querylink.toml` (current working directory)
//! 2. `../querylink.json` or `../querylink.toml` (parent directory)
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use querylink_domain::{Credentials, Result, TransportConfig, TransportError};

/// Required variables; the environment is only used when all are set.
const REQUIRED_VARS: [&str; 2] = ["QUERYLINK_ENDPOINT", "QUERYLINK_INSTANCE_ID"];

/// Load configuration with automatic fallback strategy
///
/// Uses the environment when every required variable is set. If any required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `TransportError::Config` if:
/// - An environment variable that is set has an invalid value
/// - No config file is found when the environment is incomplete
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<TransportConfig> {
    let missing: Vec<&str> =
        REQUIRED_VARS.iter().copied().filter(|key| env_opt(key).is_none()).collect();

    if missing.is_empty() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    tracing::debug!(?missing, "Environment incomplete, trying config file");
    load_from_file(None)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `TransportError::Config` if required variables are missing,
/// have invalid values, or the result fails validation.
pub fn load_from_env() -> Result<TransportConfig> {
    let endpoint = env_var("QUERYLINK_ENDPOINT")?;
    let instance_id = env_var("QUERYLINK_INSTANCE_ID")?;

    let mut credentials = Credentials::new(
        env_opt("QUERYLINK_CLIENT_ID").unwrap_or_default(),
        env_opt("QUERYLINK_CLIENT_SECRET").unwrap_or_default(),
        instance_id,
    );
    credentials.auth_host = env_opt("QUERYLINK_AUTH_HOST");

    let mut config = TransportConfig::new(endpoint, credentials);
    config.bypass_auth = env_bool("QUERYLINK_BYPASS_AUTH")?.unwrap_or(false);

    if let Some(value) = env_parse("QUERYLINK_CONNECT_TIMEOUT_MS")? {
        config.http.connect_timeout_ms = value;
    }
    if let Some(value) = env_parse("QUERYLINK_RESPONSE_TIMEOUT_MS")? {
        config.http.response_timeout_ms = value;
    }
    if let Some(value) = env_parse("QUERYLINK_MAX_ATTEMPTS")? {
        config.http.max_attempts = value;
    }
    if let Some(value) = env_parse("QUERYLINK_RETRY_BACKOFF_MS")? {
        config.http.retry_backoff_ms = value;
    }

    config.logging.enabled = env_bool("QUERYLINK_LOG_ENABLED")?.unwrap_or(false);
    config.logging.json = env_bool("QUERYLINK_LOG_JSON")?.unwrap_or(false);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TransportError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<TransportConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TransportError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TransportError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TransportError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<TransportConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TransportError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TransportError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TransportError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> [PathBuf; 4] {
    [
        dir.join("querylink.json"),
        dir.join("querylink.toml"),
        dir.join("../querylink.json"),
        dir.join("../querylink.toml"),
    ]
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        TransportError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-empty environment variable, if set.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Strict boolean: `true`/`false` (case-insensitive), anything else is an error.
fn env_bool(key: &str) -> Result<Option<bool>> {
    match env_opt(key) {
        None => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(value) if value.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(value) => Err(TransportError::Config(format!(
            "Invalid value for {key}. Expected 'true' or 'false', but got: {value}"
        ))),
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|e| TransportError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}
