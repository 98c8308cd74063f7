//! Configuration loading and resolution
//!
//! Config file priority order:
//! 1. Explicit path (command-line argument or `NFEASY_CONFIG`)
//! 2. `~/.config/nfeasy/config.toml`
//! 3. Compiled defaults
//!
//! A missing default file is not an error. An explicitly named file that
//! cannot be read or parsed is.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "NFEASY_CONFIG";

/// Full service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub validation: ValidationConfig,
    pub ebs: EbsConfig,
    pub edap: EdapConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; RUST_LOG overrides it
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Invoice validation simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub delay_ms: u64,
    /// Probability in [0, 1] that a validation run fails
    pub failure_rate: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            failure_rate: 0.3,
        }
    }
}

impl ValidationConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// EBS connector simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EbsConfig {
    pub probe_delay_ms: u64,
    pub post_delay_ms: u64,
}

impl Default for EbsConfig {
    fn default() -> Self {
        Self {
            probe_delay_ms: 1000,
            post_delay_ms: 1500,
        }
    }
}

/// EDAP connector simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdapConfig {
    pub probe_delay_ms: u64,
    pub send_delay_ms: u64,
    /// Probability in [0, 1] that a send is accepted
    pub success_rate: f64,
    pub manifestation_delay_ms: u64,
}

impl Default for EdapConfig {
    fn default() -> Self {
        Self {
            probe_delay_ms: 800,
            send_delay_ms: 2000,
            success_rate: 0.8,
            manifestation_delay_ms: 1200,
        }
    }
}

impl ServiceConfig {
    /// Configuration with every simulated delay set to zero
    pub fn without_delays() -> Self {
        let mut config = Self::default();
        config.validation.delay_ms = 0;
        config.ebs.probe_delay_ms = 0;
        config.ebs.post_delay_ms = 0;
        config.edap.probe_delay_ms = 0;
        config.edap.send_delay_ms = 0;
        config.edap.manifestation_delay_ms = 0;
        config
    }

    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ServiceConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        check_rate("validation.failure_rate", self.validation.failure_rate)?;
        check_rate("edap.success_rate", self.edap.success_rate)?;
        if self.server.host.trim().is_empty() {
            return Err(Error::Config("server.host must not be empty".to_string()));
        }
        Ok(())
    }
}

fn check_rate(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )))
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line or by `NFEASY_CONFIG`
    Explicit(PathBuf),
    /// Found at the per-user default location
    UserFile(PathBuf),
    /// No file; compiled defaults
    Defaults,
}

impl ConfigSource {
    /// Report the source; falling back to defaults is a warning
    ///
    /// Call after the tracing subscriber is installed, otherwise the events
    /// are dropped.
    pub fn log(&self) {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::UserFile(path) => {
                info!("Loaded configuration from {}", path.display())
            }
            ConfigSource::Defaults => warn!("No config file found, using compiled defaults"),
        }
    }
}

/// Resolve and load the service configuration
///
/// `explicit` comes from the command line; when absent `NFEASY_CONFIG` is
/// consulted, then the per-user default location. Nothing is logged here
/// since this runs before logging is configured; see [`ConfigSource::log`].
pub fn load_config(explicit: Option<&Path>) -> Result<(ServiceConfig, ConfigSource)> {
    // Priority 1: explicit path (CLI, then environment)
    let explicit = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from));

    if let Some(path) = explicit {
        let config = ServiceConfig::from_file(&path)?;
        return Ok((config, ConfigSource::Explicit(path)));
    }

    // Priority 2: per-user config file
    if let Some(path) = default_config_path() {
        if path.exists() {
            let config = ServiceConfig::from_file(&path)?;
            return Ok((config, ConfigSource::UserFile(path)));
        }
    }

    // Priority 3: compiled defaults
    Ok((ServiceConfig::default(), ConfigSource::Defaults))
}

/// `~/.config/nfeasy/config.toml` (platform equivalent elsewhere)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nfeasy").join("config.toml"))
}
