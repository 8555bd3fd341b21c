//! Run configuration for feedpipe.
//!
//! [`RunConfig`] is the immutable, fully-resolved configuration handed to the
//! pipeline. Fetch tuning can additionally be read from
//! `~/.config/feedpipe/config.toml` (or a path given with `--config`); CLI
//! flags override whatever the file sets.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_USER_AGENT: &str = concat!("feedpipe/", env!("CARGO_PKG_VERSION"));

/// Settings file contents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fetch: FetchSettings,
}

/// How feeds are fetched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Maximum number of feeds fetched at once (default: 10)
    pub workers: usize,

    /// Per-feed fetch timeout in seconds (default: 10)
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Responses larger than this are rejected (default: 10 MiB)
    pub max_body_bytes: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Worker count, never zero.
    pub fn workers(&self) -> usize {
        self.workers.max(1)
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// A missing file at the default location yields defaults. A missing
    /// file that was asked for explicitly is an error, as is invalid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path()?, false),
        };

        if !explicit && !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse { path, source: e })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get the default settings path: `~/.config/feedpipe/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("feedpipe").join("config.toml"))
    }
}

/// Everything one pipeline run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    /// Output format identifier as given by the user; validated by the pipeline.
    pub format: String,
    pub verbose: bool,
    pub fetch: FetchSettings,
    /// Items published before this instant are dropped.
    pub since: Option<DateTime<Utc>>,
}

impl RunConfig {
    pub fn new(
        source_path: impl Into<PathBuf>,
        destination_path: impl Into<PathBuf>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            destination_path: destination_path.into(),
            format: format.into(),
            verbose: false,
            fetch: FetchSettings::default(),
            since: None,
        }
    }

    /// Default `tracing` filter for this run, used when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "feedpipe=debug"
        } else {
            "feedpipe=warn"
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
