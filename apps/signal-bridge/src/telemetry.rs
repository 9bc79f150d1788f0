//! Tracing Setup
//!
//! Logs go to the console and to an append-only file.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives (default: `signal_bridge=<logging.level>`)
//! - `observability.logging.format`: console format, `pretty` or `json`
//! - `observability.logging.log_dir` / `log_file`: file location
//!   (default: `logs/app.log`)
//!
//! The file layer is always plain text without ANSI colors.
//!
//! # Usage
//!
//! ```rust,ignore
//! use signal_bridge::telemetry::init_telemetry;
//!
//! let log_path = init_telemetry(&config.observability.logging)?;
//! ```

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Telemetry setup errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log file could not be created or opened.
    #[error("Failed to open log file '{path}': {source}")]
    LogFile {
        /// Path of the log file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The log level is not a valid filter directive.
    #[error("Invalid log level '{level}': {source}")]
    InvalidLevel {
        /// Configured level.
        level: String,
        /// Parse error.
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber is already installed.
    #[error("Tracing already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber.
///
/// Returns the path of the log file being appended to.
pub fn init_telemetry(config: &LoggingConfig) -> Result<PathBuf, TelemetryError> {
    let filter = build_filter(&config.level)?;
    let path = config.log_path();
    let file = open_log_file(&path)?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    let (pretty_layer, json_layer) = if config.format == "json" {
        (None, Some(fmt::layer().json().with_current_span(true)))
    } else {
        (Some(fmt::layer().with_target(true)), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()?;

    Ok(path)
}

/// `RUST_LOG` when set and valid, otherwise `signal_bridge=<level>`.
fn build_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = format!("signal_bridge={}", level.trim().to_ascii_lowercase());
    EnvFilter::try_new(&directive).map_err(|source| TelemetryError::InvalidLevel {
        level: level.to_string(),
        source,
    })
}

/// Create the log directory if needed and open the file for appending.
fn open_log_file(path: &Path) -> Result<File, TelemetryError> {
    let to_error = |source| TelemetryError::LogFile {
        path: path.display().to_string(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(to_error)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_error)
}
