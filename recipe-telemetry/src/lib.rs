//! Observability setup.
//!
//! Installs a global `tracing` subscriber: an [`EnvFilter`] built from
//! `RUST_LOG` or the configured level, and a `fmt` layer writing text or JSON
//! lines to stderr so stdout stays free for command output.

#![warn(missing_docs, clippy::pedantic)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt as fmt_layer};

/// Environment variable that overrides the configured filter.
pub const RUST_LOG_ENV: &str = "RUST_LOG";

/// Result alias for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialised,

    /// The filter directive could not be parsed.
    #[error("invalid log filter `{directive}`: {reason}")]
    InvalidDirective {
        /// Offending directive.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// Unknown output format name.
    #[error("unknown log format `{name}` (expected `text` or `json`)")]
    UnknownFormat {
        /// Rejected name.
        name: String,
    },
}

/// Line format of the log output.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(TelemetryError::UnknownFormat {
                name: other.to_owned(),
            }),
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter directive, e.g. `info` or `recipe_flows=debug,info`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Colour text output.
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Builds the filter, preferring `rust_log` when it is set and non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidDirective`] for an unparsable directive.
    pub fn filter(&self, rust_log: Option<&str>) -> TelemetryResult<EnvFilter> {
        let directive = rust_log
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.level.trim());
        EnvFilter::try_new(directive).map_err(|err| TelemetryError::InvalidDirective {
            directive: directive.to_owned(),
            reason: err.to_string(),
        })
    }
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidDirective`] for a bad filter and
/// [`TelemetryError::AlreadyInitialised`] when called a second time.
pub fn init(config: &TelemetryConfig) -> TelemetryResult<()> {
    let rust_log = std::env::var(RUST_LOG_ENV).ok();
    let filter = config.filter(rust_log.as_deref())?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                fmt_layer::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt_layer::layer()
                    .with_target(true)
                    .with_ansi(config.ansi)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    installed.map_err(|_| TelemetryError::AlreadyInitialised)?;

    debug!(format = %config.format, "telemetry initialised");
    Ok(())
}
