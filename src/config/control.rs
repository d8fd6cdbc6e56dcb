//! Control endpoint configuration.

use serde::Deserialize;
use std::path::PathBuf;

use super::defaults::default_queue_capacity;

/// Which transport front-end feeds the command queue.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ControlBackend {
    /// Unix socket, any number of concurrent connections.
    #[default]
    Socket,
    /// A single duplex handle (stdin/stdout).
    Handle,
}

/// Control endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlConfig {
    #[serde(default)]
    pub backend: ControlBackend,
    /// Socket path. Defaults to `<dir>/ctl`.
    pub socket: Option<PathBuf>,
    /// Command queue capacity. Commands submitted while full are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            backend: ControlBackend::default(),
            socket: None,
            queue_capacity: default_queue_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_default_is_socket() {
        assert_eq!(ControlBackend::default(), ControlBackend::Socket);
    }

    #[test]
    fn backend_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            backend: ControlBackend,
        }
        let w: Wrapper = toml::from_str(r#"backend = "handle""#).unwrap();
        assert_eq!(w.backend, ControlBackend::Handle);
    }
}
