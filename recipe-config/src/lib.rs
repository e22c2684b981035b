//! Configuration for recipe generation services.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then environment variables.
//!
//! ```toml
//! [provider]
//! kind = "ollama"
//! model = "llama3.1"
//! base_url = "http://127.0.0.1:11434"
//! timeout_secs = 120
//!
//! [telemetry]
//! level = "recipe_flows=debug,info"
//! format = "json"
//! ```

#![warn(missing_docs, clippy::pedantic)]

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub use recipe_telemetry::{LogFormat, TelemetryConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Selects the provider.
pub const PROVIDER_ENV: &str = "RECIPE_PROVIDER";
/// Overrides the model name.
pub const MODEL_ENV: &str = "RECIPE_MODEL";
/// Overrides the provider base URL.
pub const BASE_URL_ENV: &str = "RECIPE_BASE_URL";
/// Overrides the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "RECIPE_TIMEOUT_SECS";
/// Overrides the log filter.
pub const LOG_ENV: &str = "RECIPE_LOG";
/// Overrides the log format.
pub const LOG_FORMAT_ENV: &str = "RECIPE_LOG_FORMAT";
/// Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// `OpenAI` API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {source}")]
    Parse {
        /// Underlying TOML error.
        #[from]
        source: toml::de::Error,
    },

    /// A value is out of range or unknown.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending setting.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// Convenience constructor for invalid values.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Model backend.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini.
    #[default]
    Gemini,
    /// A local or remote Ollama daemon.
    Ollama,
    /// `OpenAI` chat completions.
    #[serde(rename = "openai")]
    OpenAi,
    /// Offline replies synthesised from the output schema.
    Canned,
}

impl ProviderKind {
    /// Model used when none is configured.
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.0-flash",
            Self::Ollama => "llama3.1",
            Self::OpenAi => "gpt-4o-mini",
            Self::Canned => "canned",
        }
    }

    /// Environment variable holding the API key, if the provider needs one.
    #[must_use]
    pub const fn api_key_env(self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some(GEMINI_API_KEY_ENV),
            Self::OpenAi => Some(OPENAI_API_KEY_ENV),
            Self::Ollama | Self::Canned => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Canned => "canned",
        })
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            "canned" => Ok(Self::Canned),
            other => Err(ConfigError::invalid(
                "provider.kind",
                format!("unknown provider `{other}`"),
            )),
        }
    }
}

/// Backend connection settings.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Which backend to call.
    pub kind: ProviderKind,
    /// Model name; the provider default when absent.
    pub model: Option<String>,
    /// Base URL override.
    pub base_url: Option<String>,
    /// API key; read from the provider's environment variable when absent.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model: None,
            base_url: None,
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("model", &self.model())
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Configured model, or the provider default.
    #[must_use]
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.kind.default_model())
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RecipeConfig {
    /// Backend settings.
    pub provider: ProviderConfig,
    /// Logging settings.
    pub telemetry: TelemetryConfig,
}

impl RecipeConfig {
    /// Parses TOML. Missing tables and keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or mistyped values.
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`RecipeConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml_str(&contents)
    }

    /// Defaults or `path`, then process environment, then validation.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from the individual steps.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// See [`RecipeConfig::apply_env_with`].
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Blank values are ignored.
    ///
    /// When `RECIPE_PROVIDER` selects a different provider, the model, base URL
    /// and API key configured for the previous one are discarded. The API key
    /// variable is only consulted when no key is configured, and only for the
    /// provider selected after `RECIPE_PROVIDER` is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unknown provider, a
    /// non-numeric timeout or an unknown log format.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        if let Some(kind) = get(PROVIDER_ENV) {
            let kind: ProviderKind = kind.parse()?;
            if kind != self.provider.kind {
                debug!(from = %self.provider.kind, to = %kind, "provider switched by environment");
                self.provider = ProviderConfig {
                    kind,
                    timeout_secs: self.provider.timeout_secs,
                    ..ProviderConfig::default()
                };
            }
        }
        if let Some(model) = get(MODEL_ENV) {
            self.provider.model = Some(model);
        }
        if let Some(base_url) = get(BASE_URL_ENV) {
            self.provider.base_url = Some(base_url);
        }
        if let Some(timeout) = get(TIMEOUT_ENV) {
            self.provider.timeout_secs = timeout.parse().map_err(|err| {
                ConfigError::invalid("provider.timeout_secs", format!("`{timeout}`: {err}"))
            })?;
        }
        if self.provider.api_key.is_none() {
            self.provider.api_key = self.provider.kind.api_key_env().and_then(get);
        }
        if let Some(level) = get(LOG_ENV) {
            self.telemetry.level = level;
        }
        if let Some(format) = get(LOG_FORMAT_ENV) {
            self.telemetry.format = format
                .parse()
                .map_err(|err: recipe_telemetry::TelemetryError| {
                    ConfigError::invalid("telemetry.format", err.to_string())
                })?;
        }

        debug!(provider = %self.provider.kind, model = self.provider.model(), "applied environment");
        Ok(())
    }

    /// Checks values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero timeout, a blank model name
    /// or a blank base URL.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "provider.timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.provider.model().trim().is_empty() {
            return Err(ConfigError::invalid("provider.model", "must not be empty"));
        }
        if self
            .provider
            .base_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            return Err(ConfigError::invalid("provider.base_url", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = RecipeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Gemini);
        assert_eq!(config.provider.model(), "gemini-2.0-flash");
        assert_eq!(config.provider.timeout(), Duration::from_secs(60));
        assert_eq!(config.telemetry.format, LogFormat::Text);
    }

    #[test]
    fn parses_partial_toml() {
        let config = RecipeConfig::from_toml_str(
            r#"
            [provider]
            kind = "openai"
            timeout_secs = 15

            [telemetry]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.provider.model(), "gpt-4o-mini");
        assert_eq!(config.provider.timeout_secs, 15);
        assert_eq!(config.telemetry.format, LogFormat::Json);
        assert_eq!(config.telemetry.level, "info");
    }

    #[test]
    fn rejects_unknown_provider_in_toml() {
        let err = RecipeConfig::from_toml_str("[provider]\nkind = \"bard\"").expect_err("unknown");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn environment_overrides_file() {
        let mut config =
            RecipeConfig::from_toml_str("[provider]\nkind = \"gemini\"\nmodel = \"gemini-pro\"")
                .unwrap();
        config
            .apply_env_with(env(&[
                (PROVIDER_ENV, "ollama"),
                (MODEL_ENV, "qwen2.5"),
                (BASE_URL_ENV, "http://gpu-box:11434"),
                (TIMEOUT_ENV, " 300 "),
                (LOG_ENV, "debug"),
                (LOG_FORMAT_ENV, "json"),
                (GEMINI_API_KEY_ENV, "ignored"),
            ]))
            .unwrap();

        assert_eq!(config.provider.kind, ProviderKind::Ollama);
        assert_eq!(config.provider.model(), "qwen2.5");
        assert_eq!(config.provider.base_url.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(config.provider.timeout_secs, 300);
        assert_eq!(config.provider.api_key, None);
        assert_eq!(config.telemetry.level, "debug");
        assert_eq!(config.telemetry.format, LogFormat::Json);
    }

    #[test]
    fn api_key_follows_selected_provider() {
        let mut config = RecipeConfig::default();
        config
            .apply_env_with(env(&[
                (PROVIDER_ENV, "openai"),
                (GEMINI_API_KEY_ENV, "gemini-key"),
                (OPENAI_API_KEY_ENV, "openai-key"),
            ]))
            .unwrap();
        assert_eq!(config.provider.api_key.as_deref(), Some("openai-key"));

        let mut configured = RecipeConfig::default();
        configured.provider.api_key = Some("from-file".into());
        configured
            .apply_env_with(env(&[(GEMINI_API_KEY_ENV, "from-env")]))
            .unwrap();
        assert_eq!(configured.provider.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn switching_provider_drops_previous_credentials() {
        let mut config = RecipeConfig::from_toml_str(
            r#"
            [provider]
            kind = "gemini"
            model = "gemini-pro"
            base_url = "https://gemini.internal"
            api_key = "gemini-secret"
            timeout_secs = 30
            "#,
        )
        .unwrap();
        config
            .apply_env_with(env(&[(PROVIDER_ENV, "openai")]))
            .unwrap();

        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.provider.api_key, None);
        assert_eq!(config.provider.base_url, None);
        assert_eq!(config.provider.model(), "gpt-4o-mini");
        assert_eq!(config.provider.timeout_secs, 30);

        let mut same = RecipeConfig::default();
        same.provider.api_key = Some("kept".into());
        same.apply_env_with(env(&[(PROVIDER_ENV, "gemini")])).unwrap();
        assert_eq!(same.provider.api_key.as_deref(), Some("kept"));
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let mut config = RecipeConfig::default();
        config
            .apply_env_with(env(&[(MODEL_ENV, "  "), (PROVIDER_ENV, "")]))
            .unwrap();
        assert_eq!(config, RecipeConfig::default());
    }

    #[test]
    fn bad_environment_values_are_reported() {
        let err = RecipeConfig::default()
            .apply_env_with(env(&[(TIMEOUT_ENV, "soon")]))
            .expect_err("timeout");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "provider.timeout_secs",
                ..
            }
        ));

        let err = RecipeConfig::default()
            .apply_env_with(env(&[(LOG_FORMAT_ENV, "xml")]))
            .expect_err("format");
        assert!(matches!(err, ConfigError::Invalid { field: "telemetry.format", .. }));

        let err = RecipeConfig::default()
            .apply_env_with(env(&[(PROVIDER_ENV, "bard")]))
            .expect_err("provider");
        assert!(matches!(err, ConfigError::Invalid { field: "provider.kind", .. }));
    }

    #[test]
    fn validation_rejects_unusable_values() {
        let mut config = RecipeConfig::default();
        config.provider.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "provider.timeout_secs", .. })
        ));

        let mut config = RecipeConfig::default();
        config.provider.model = Some("  ".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "provider.model", .. })
        ));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let mut config = RecipeConfig::default();
        config.provider.api_key = Some("secret-value".into());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-value"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = RecipeConfig::load("/definitely/not/here/recipe.toml").expect_err("missing");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
