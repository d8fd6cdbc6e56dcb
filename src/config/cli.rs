//! Command-line overrides.
//!
//! Flags take precedence over the TOML file; the file itself is optional.

use clap::Parser;
use std::path::PathBuf;

use super::control::ControlBackend;
use super::types::{Config, ConfigError};

/// Straylight IRC Bridge.
#[derive(Debug, Default, Parser)]
#[command(name = "slirc-bridge", version, about)]
pub struct Args {
    /// Path to a TOML configuration file.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Nickname to register with.
    #[arg(long)]
    pub nick: Option<String>,

    /// Username to log into the server with.
    #[arg(long)]
    pub user: Option<String>,

    /// Address (host and port) of the IRC server.
    #[arg(long)]
    pub server: Option<String>,

    /// Directory holding the per-target transcripts (default `/tmp/<svc>`).
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Service name; also names the default directory.
    #[arg(long)]
    pub svc: Option<String>,

    /// Connect without TLS.
    #[arg(long)]
    pub no_tls: bool,

    /// Read control commands from stdin instead of a socket.
    #[arg(long)]
    pub stdio: bool,
}

impl Args {
    /// Load the configured file (if any) and layer the flags on top.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(self, config: &mut Config) {
        if let Some(svc) = self.svc {
            config.svc = svc;
        }
        if let Some(nick) = self.nick {
            config.session.nick = nick;
        }
        if let Some(user) = self.user {
            config.session.user = user;
        }
        if let Some(server) = self.server {
            config.session.server = server;
        }
        if let Some(dir) = self.dir {
            config.storage.dir = Some(dir);
        }
        if self.no_tls {
            config.session.tls = false;
        }
        if self.stdio {
            config.control.backend = ControlBackend::Handle;
        }
    }
}
