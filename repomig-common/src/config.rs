//! Configuration loading for repomig
//!
//! Bootstrap settings come from a TOML file. Resolution order for every value:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not fatal: a warning is logged and compiled
//! defaults are used. A config file that exists but cannot be parsed is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const ENV_CONFIG_PATH: &str = "REPOMIG_CONFIG";
/// Environment variable overriding the source repository password
pub const ENV_SOURCE_PASSWORD: &str = "REPOMIG_SOURCE_PASSWORD";
/// Environment variable overriding the target repository password
pub const ENV_TARGET_PASSWORD: &str = "REPOMIG_TARGET_PASSWORD";
/// Environment variable overriding the namespace for new objects
pub const ENV_NAMESPACE: &str = "REPOMIG_NAMESPACE";
/// Environment variable overriding the HTTP bind address
pub const ENV_BIND: &str = "REPOMIG_BIND";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Legacy repository (read side)
    #[serde(default)]
    pub source: RepositoryConfig,

    /// Successor repository (write side)
    #[serde(default)]
    pub target: RepositoryConfig,

    /// Migration behaviour
    #[serde(default)]
    pub migration: MigrationSettings,

    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Endpoint and credentials of one Fedora REST API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryConfig {
    /// Base URL up to and including the `/fedora` context, e.g. `http://host:8080/fedora`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Basic-auth user
    #[serde(default = "default_username")]
    pub username: String,

    /// Basic-auth password (prefer the environment over the TOML file)
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: default_username(),
            password: None,
        }
    }
}

/// Settings that shape the objects a migration creates
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MigrationSettings {
    /// Namespace for newly created target objects
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Per-request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            request_timeout_secs: None,
        }
    }
}

/// HTTP service settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/fedora".to_string()
}

fn default_username() -> String {
    "fedoraAdmin".to_string()
}

fn default_namespace() -> String {
    "coccc".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:5730".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub bind: Option<String>,
    pub namespace: Option<String>,
}

impl TomlConfig {
    /// Resolve the full configuration: file, then environment, then CLI overrides
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let path = resolve_config_path(overrides.config_path.as_deref());
        let mut config = match path {
            Some(path) => load_toml_config(&path)?,
            None => {
                warn!("No config file found, using compiled defaults");
                TomlConfig::default()
            }
        };

        config.apply_env();

        if let Some(bind) = &overrides.bind {
            config.server.bind = bind.clone();
        }
        if let Some(namespace) = &overrides.namespace {
            config.migration.namespace = namespace.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(password) = std::env::var(ENV_SOURCE_PASSWORD) {
            self.source.password = Some(password);
        }
        if let Ok(password) = std::env::var(ENV_TARGET_PASSWORD) {
            self.target.password = Some(password);
        }
        if let Ok(namespace) = std::env::var(ENV_NAMESPACE) {
            self.migration.namespace = namespace;
        }
        if let Ok(bind) = std::env::var(ENV_BIND) {
            self.server.bind = bind;
        }
    }

    /// Reject settings that would make every request fail
    pub fn validate(&self) -> Result<()> {
        for (side, repo) in [("source", &self.source), ("target", &self.target)] {
            if repo.base_url.trim().is_empty() {
                return Err(Error::Config(format!("{side}.base_url must not be empty")));
            }
            if !repo.base_url.starts_with("http://") && !repo.base_url.starts_with("https://") {
                return Err(Error::Config(format!(
                    "{side}.base_url must be an http(s) URL, got '{}'",
                    repo.base_url
                )));
            }
        }

        let namespace = self.migration.namespace.trim();
        if namespace.is_empty() || namespace.contains(':') {
            return Err(Error::Config(format!(
                "migration.namespace must be a non-empty pid prefix, got '{}'",
                self.migration.namespace
            )));
        }

        Ok(())
    }
}

/// Locate the config file
///
/// Priority: CLI path → `REPOMIG_CONFIG` → `<config_dir>/repomig/config.toml`.
/// The platform default is only returned if it exists; explicit paths are
/// returned as given so that a typo surfaces as a warning.
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir()
        .map(|d| d.join("repomig").join("config.toml"))
        .filter(|p| p.exists())
}

/// Read and parse a TOML config file
///
/// A missing file yields defaults with a warning.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!("Config file {} not found, using compiled defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}
