//! Observability configuration for logging.

use serde::{Deserialize, Serialize};

/// Observability configuration (logging only).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObservabilityConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level for this crate when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Console output format: "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory holding the append-only log file.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// Log file name inside `log_dir`.
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl LoggingConfig {
    /// Full path of the log file.
    #[must_use]
    pub fn log_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.log_dir).join(&self.log_file)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: default_log_dir(),
            log_file: default_log_file(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_file() -> String {
    "app.log".to_string()
}
