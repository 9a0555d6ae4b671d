//! Layered application configuration.
//!
//! Values are resolved in order: built-in defaults, an optional TOML file,
//! `SCHOLAR_CHAT__*` environment variables, then command-line overrides.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable prefix, nested keys are separated by `__`
pub const ENV_PREFIX: &str = "SCHOLAR_CHAT";

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.semanticscholar.org/graph/v1/paper/search";

/// Accepted range for the number of candidates requested upstream
pub const SEARCH_LIMIT_RANGE: std::ops::RangeInclusive<u32> = 6..=12;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub synthesis: SynthesisConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub graceful_shutdown_timeout_secs: u64,
    /// Value of `Access-Control-Allow-Origin` on every chat response
    pub allow_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            graceful_shutdown_timeout_secs: 5,
            allow_origin: "*".to_string(),
        }
    }
}

/// Upstream paper search settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    /// Number of candidates requested per question
    pub limit: u32,
    /// Upper bound on a single upstream call, elapsed calls count as unavailable
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            limit: 12,
            timeout_secs: 15,
            user_agent: format!(
                "{}/{} (Literature Chat)",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which reference fields are surfaced in the response
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceFields {
    /// ref, title, year, venue, authors, url
    #[default]
    Full,
    /// ref, title, year, url
    Compact,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Maximum number of usable candidates turned into references
    pub max_references: usize,
    pub reference_fields: ReferenceFields,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_references: 6,
            reference_fields: ReferenceFields::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Command-line overrides applied on top of the file and environment layers
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl Config {
    /// Load configuration from an explicit file, or the user config dir when present.
    /// Not validated: apply overrides first, then call [`Config::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };

        let mut builder = config::Config::builder();
        if let Some(file) = &file {
            debug!("Loading configuration file {}", file.display());
            builder = builder.add_source(config::File::from(file.as_path()).required(true));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a TOML file without consulting the environment
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents).map_err(|e| Error::Parse {
            context: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/scholar-chat/config.toml` or the platform equivalent
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("config.toml"))
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(ref host) = overrides.server_host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(ref level) = overrides.log_level {
            self.logging.level = level.clone();
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::invalid_input("server.port", "must be between 1 and 65535"));
        }
        if self.server.graceful_shutdown_timeout_secs == 0 {
            return Err(Error::invalid_input(
                "server.graceful_shutdown_timeout_secs",
                "must be greater than zero",
            ));
        }

        let endpoint = url::Url::parse(&self.search.endpoint)
            .map_err(|e| Error::invalid_input("search.endpoint", e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::invalid_input(
                "search.endpoint",
                format!("unsupported scheme '{}'", endpoint.scheme()),
            ));
        }
        if !SEARCH_LIMIT_RANGE.contains(&self.search.limit) {
            return Err(Error::invalid_input(
                "search.limit",
                format!(
                    "must be between {} and {}",
                    SEARCH_LIMIT_RANGE.start(),
                    SEARCH_LIMIT_RANGE.end()
                ),
            ));
        }
        if self.search.timeout_secs == 0 {
            return Err(Error::invalid_input("search.timeout_secs", "must be greater than zero"));
        }

        let max_references = self.synthesis.max_references;
        if max_references == 0 || max_references > self.search.limit as usize {
            return Err(Error::invalid_input(
                "synthesis.max_references",
                format!("must be between 1 and search.limit ({})", self.search.limit),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::invalid_input(
                "logging.level",
                format!("Invalid log level. Valid levels: {VALID_LOG_LEVELS:?}"),
            ));
        }

        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Service(format!("Failed to render config: {e}")))
    }
}
