//! Configuration module for the signal bridge.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation. A bare environment is enough to run: when no file is found
//! the embedded template maps the documented variables.
//!
//! # Usage
//!
//! ```rust,ignore
//! use signal_bridge::config::load_config;
//!
//! // Explicit path, then $SIGNAL_BRIDGE_CONFIG, then ./config.yaml,
//! // then the embedded template
//! let config = load_config(None)?;
//!
//! println!("webhook port: {}", config.server.http_port);
//! ```

mod broker;
mod observability;
mod serde_helpers;
mod server;
mod trading;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use broker::BrokerConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use server::ServerConfig;
pub use trading::TradingConfig;

/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "SIGNAL_BRIDGE_CONFIG";

/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Template used when no config file is present.
pub const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default.yaml");

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Broker configuration.
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Trading configuration.
    #[serde(default)]
    pub trading: TradingConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Where configuration is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A YAML file.
    File(PathBuf),
    /// The embedded template.
    Embedded,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => write!(f, "embedded template"),
        }
    }
}

/// Decide where configuration comes from.
///
/// An explicit path wins, then `SIGNAL_BRIDGE_CONFIG`, then `config.yaml` in
/// the working directory, then the embedded template.
#[must_use]
pub fn resolve_config_source(path: Option<&str>) -> ConfigSource {
    if let Some(path) = path {
        return ConfigSource::File(PathBuf::from(path));
    }
    if let Some(path) = std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
    {
        return ConfigSource::File(PathBuf::from(path.trim()));
    }
    if Path::new(DEFAULT_CONFIG_FILE).is_file() {
        return ConfigSource::File(PathBuf::from(DEFAULT_CONFIG_FILE));
    }
    ConfigSource::Embedded
}

/// Load the nearest `.env` file, searching `start` and then its ancestors.
///
/// Returns the path that was loaded, or `None` when no file exists. Variables
/// already set in the environment are not overridden.
///
/// # Errors
///
/// Returns the `dotenvy` error when a `.env` file exists but cannot be read or
/// parsed.
pub fn load_dotenv(start: &Path) -> Result<Option<PathBuf>, dotenvy::Error> {
    for candidate in start.ancestors().map(|dir| dir.join(".env")) {
        if candidate.is_file() {
            return dotenvy::from_path(&candidate).map(|()| Some(candidate));
        }
    }
    Ok(None)
}

/// Load configuration with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. See [`resolve_config_source`].
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    match resolve_config_source(path) {
        ConfigSource::File(path) => {
            let contents =
                std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
                    path: path.display().to_string(),
                    source: e,
                })?;
            load_config_from_string(&contents)
        }
        ConfigSource::Embedded => load_config_from_string(DEFAULT_CONFIG_TEMPLATE),
    }
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
fn interpolate_env_vars(input: &str) -> String {
    interpolate_with(input, |name| std::env::var(name).ok())
}

/// Interpolate placeholders using `lookup` to resolve variable names.
///
/// A placeholder that fills a whole double-quoted scalar (`"${VAR}"`) is
/// replaced by an escaped YAML string, so quotes and backslashes in the value
/// arrive verbatim. Other placeholders are substituted as raw text.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r#"("?)\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}("?)"#)
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(3).map_or("", |m| m.as_str());
        let value = match lookup(&cap[2]) {
            Some(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        };
        let (open, close) = (&cap[1], &cap[4]);
        if open.is_empty() || close.is_empty() {
            format!("{open}{value}{close}")
        } else {
            serde_json::Value::String(value).to_string()
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.http_port == 0 {
        return Err(ConfigError::ValidationError(
            "server.http_port must be non-zero".to_string(),
        ));
    }

    if config.trading.default_qty == 0 {
        return Err(ConfigError::ValidationError(
            "trading.default_qty must be positive".to_string(),
        ));
    }

    for (name, value) in [
        ("trading.exchange", &config.trading.exchange),
        ("trading.underlying", &config.trading.underlying),
        ("trading.series_marker", &config.trading.series_marker),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{name} must not be empty"
            )));
        }
    }

    if config.trading.instrument_symbol.is_some() != config.trading.instrument_token.is_some() {
        return Err(ConfigError::ValidationError(
            "trading.instrument_symbol and trading.instrument_token must be set together"
                .to_string(),
        ));
    }

    if config.broker.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "broker.timeout_secs must be positive".to_string(),
        ));
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}
