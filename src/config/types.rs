//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::control::ControlConfig;
use super::defaults::{default_server, default_svc, default_true, default_user};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bridge configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Service name. Also names the default log directory (`/tmp/<svc>`).
    #[serde(default = "default_svc")]
    pub svc: String,
    /// IRC session settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Transcript storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Control endpoint settings.
    #[serde(default)]
    pub control: ControlConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            svc: default_svc(),
            session: SessionConfig::default(),
            storage: StorageConfig::default(),
            control: ControlConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Directory holding one transcript file per target.
    pub fn log_dir(&self) -> PathBuf {
        self.storage
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("/tmp").join(&self.svc))
    }

    /// Path of the control socket (socket backend only).
    pub fn control_socket(&self) -> PathBuf {
        self.control
            .socket
            .clone()
            .unwrap_or_else(|| self.log_dir().join(super::defaults::default_socket_name()))
    }
}

/// IRC session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Nickname to register with.
    #[serde(default)]
    pub nick: String,
    /// Username sent in USER.
    #[serde(default = "default_user")]
    pub user: String,
    /// Realname sent in USER. Defaults to the nick.
    pub realname: Option<String>,
    /// Server address (`host:port`).
    #[serde(default = "default_server")]
    pub server: String,
    /// Wrap the connection in TLS.
    #[serde(default = "default_true")]
    pub tls: bool,
    /// Verify the server certificate against the system roots.
    #[serde(default = "default_true")]
    pub verify_cert: bool,
    /// Connection password (PASS).
    pub password: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            nick: String::new(),
            user: default_user(),
            realname: None,
            server: default_server(),
            tls: true,
            verify_cert: true,
            password: None,
        }
    }
}

impl SessionConfig {
    /// Host part of `server`, used for TLS server name checks.
    pub fn host(&self) -> &str {
        self.server
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or(&self.server)
    }
}

/// Transcript storage configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Base directory. Defaults to `/tmp/<svc>`.
    pub dir: Option<PathBuf>,
}
