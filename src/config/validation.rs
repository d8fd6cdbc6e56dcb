//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("nick not provided")]
    MissingNick,
    #[error("user not provided")]
    MissingUser,
    #[error("session.server must be host:port, got '{0}'")]
    InvalidServer(String),
    #[error("control.queue_capacity must be at least 1")]
    ZeroQueueCapacity,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.session.nick.is_empty() {
        errors.push(ValidationError::MissingNick);
    }
    if config.session.user.is_empty() {
        errors.push(ValidationError::MissingUser);
    }

    let server = &config.session.server;
    let has_port = server
        .rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
    if !has_port {
        errors.push(ValidationError::InvalidServer(server.clone()));
    }

    // tokio's bounded channel panics on zero capacity
    if config.control.queue_capacity == 0 {
        errors.push(ValidationError::ZeroQueueCapacity);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
