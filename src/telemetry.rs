//! Tracing setup.
//!
//! Two layers: the operator stream on stderr (filtered by `RUST_LOG`,
//! default `info`) and the session trace, which writes every event logged
//! under the [`SESSION_TRACE`] target into the reserved `log` transcript.

use std::io;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::state::TargetLog;

/// Tracing target for the protocol-level session trace.
pub const SESSION_TRACE: &str = "session";

/// Writes formatted events into a transcript.
#[derive(Clone)]
pub struct TranscriptWriter {
    log: Arc<TargetLog>,
}

impl TranscriptWriter {
    pub fn new(log: Arc<TargetLog>) -> Self {
        Self { log }
    }
}

impl io::Write for TranscriptWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.log.append_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for TranscriptWriter {
    type Writer = TranscriptWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the global subscriber.
pub fn init(session_log: Arc<TargetLog>) {
    let operator = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let session = fmt::layer()
        .with_writer(TranscriptWriter::new(session_log))
        .with_ansi(false)
        .with_target(false)
        .with_filter(Targets::new().with_target(SESSION_TRACE, Level::DEBUG));

    tracing_subscriber::registry()
        .with(operator)
        .with(session)
        .init();
}
