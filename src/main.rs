//! slirc-bridge - Straylight IRC Bridge
//!
//! Logs one IRC session into per-target transcripts and takes control
//! commands over a Unix socket or stdin.

use anyhow::Context;
use clap::Parser;
use slirc_bridge::config::{Args, ControlBackend, validate};
use slirc_bridge::control::{
    ControlListener, Dispatcher, HandleListener, SocketListener, command_queue,
};
use slirc_bridge::events::EventSink;
use slirc_bridge::session::IrcSession;
use slirc_bridge::state::{RAW_TARGET, SESSION_LOG_TARGET, TargetRegistry};
use slirc_bridge::telemetry;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config().context("Failed to load config")?;

    if let Err(errors) = validate(&config) {
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("Invalid configuration: {}", details.join("; "));
    }

    // Transcripts must exist before logging starts: the session trace
    // itself is one of them.
    let dir = config.log_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let registry = Arc::new(TargetRegistry::new(&dir));
    let session_log = registry.resolve(SESSION_LOG_TARGET)?;

    telemetry::init(session_log);

    info!(
        dir = %dir.display(),
        nick = %config.session.nick,
        server = %config.session.server,
        "Starting slirc-bridge"
    );

    let loaded = registry.load_existing().map_err(|e| {
        error!(error = %e, "Failed to load existing transcripts");
        e
    })?;
    registry.resolve(RAW_TARGET)?;
    info!(count = loaded, "Loaded existing transcripts");

    let listener: Box<dyn ControlListener> = match config.control.backend {
        ControlBackend::Socket => Box::new(SocketListener::bind(config.control_socket())?),
        ControlBackend::Handle => Box::new(HandleListener::stdio()),
    };

    let (session, reader) = IrcSession::connect(&config.session).await.map_err(|e| {
        error!(server = %config.session.server, error = %e, "Failed to connect");
        e
    })?;

    let (queue, rx) = command_queue(config.control.queue_capacity);
    let mut dispatcher = tokio::spawn(
        Dispatcher::new(rx, Arc::new(session), Arc::clone(&registry)).run(),
    );
    let mut listener = tokio::spawn(listener.run(queue));

    let sink = EventSink::new(Arc::clone(&registry));
    let session_task = reader.run(&sink);
    tokio::pin!(session_task);

    let mut listener_done = false;
    let mut dispatcher_done = false;
    loop {
        tokio::select! {
            result = &mut session_task => {
                // The reader only returns on failure or disconnect.
                return result.context("IRC session ended");
            }
            result = &mut listener, if !listener_done => {
                listener_done = true;
                result.context("Control listener panicked")?
                    .context("Control listener failed")?;
                info!("Control listener finished");
            }
            result = &mut dispatcher, if !dispatcher_done => {
                dispatcher_done = true;
                result.context("Dispatcher panicked")?
                    .context("Dispatcher failed")?;
            }
        }
    }
}
