//! Unified error handling for slirc-bridge.
//!
//! Each layer owns a small `thiserror` enum; the binary edge collapses them
//! into `anyhow::Error`.

use std::io;
use thiserror::Error;

// ============================================================================
// Command Errors (control line parsing)
// ============================================================================

/// Errors produced while parsing a control line.
///
/// The `Display` text is written back to the submitting connection verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Right verb, wrong number of fields.
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// Unknown verb.
    #[error("Invalid command {0}.")]
    Invalid(String),

    /// Line exceeded the control line limit and was discarded.
    #[error("Line too long ({len} bytes, limit {max}).")]
    TooLong { len: usize, max: usize },
}

impl CommandError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Usage(_) => "usage",
            Self::Invalid(_) => "invalid_command",
            Self::TooLong { .. } => "line_too_long",
        }
    }
}

// ============================================================================
// Listener Errors (control transport)
// ============================================================================

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to bind control socket {path}: {source}")]
    Bind {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to accept control connection: {0}")]
    Accept(#[source] io::Error),

    #[error("failed to read control input: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write control response: {0}")]
    Write(#[source] io::Error),
}

// ============================================================================
// Registry Errors (target logs)
// ============================================================================

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to open log for {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to scan log directory: {0}")]
    Scan(#[source] io::Error),

    #[error("invalid target name: {0:?}")]
    InvalidName(String),
}

// ============================================================================
// Session Errors (IRC link)
// ============================================================================

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("connection closed")]
    Closed,
}

/// Result type for session operations.
pub type SessionResult<T = ()> = Result<T, SessionError>;
