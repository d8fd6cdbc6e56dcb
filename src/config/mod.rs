//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, SessionConfig, StorageConfig)
//! - [`control`]: Control endpoint configuration (ControlConfig, ControlBackend)
//! - [`cli`]: Command-line overrides layered on top of the TOML file
//! - [`validation`]: Startup checks for required fields

mod cli;
mod control;
mod defaults;
mod types;
mod validation;

pub use cli::Args;
pub use control::{ControlBackend, ControlConfig};
pub use types::{Config, ConfigError, SessionConfig, StorageConfig};
pub use validation::{ValidationError, validate};
