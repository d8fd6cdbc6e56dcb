//! The dispatcher: sole consumer of the command queue.
//!
//! Commands are applied one at a time in admission order. Nothing else issues
//! control-driven session mutations, so the session needs no locking of its own.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::Command;
use crate::error::{RegistryError, SessionResult};
use crate::session::ChatSession;
use crate::state::{TargetRegistry, format_message, timestamp};

pub struct Dispatcher {
    rx: mpsc::Receiver<Command>,
    session: Arc<dyn ChatSession>,
    registry: Arc<TargetRegistry>,
}

impl Dispatcher {
    pub fn new(
        rx: mpsc::Receiver<Command>,
        session: Arc<dyn ChatSession>,
        registry: Arc<TargetRegistry>,
    ) -> Self {
        Self {
            rx,
            session,
            registry,
        }
    }

    /// Apply commands until every queue producer is gone.
    ///
    /// Returns an error only when an outgoing message's transcript cannot be
    /// opened.
    pub async fn run(mut self) -> Result<(), RegistryError> {
        while let Some(cmd) = self.rx.recv().await {
            self.apply(cmd).await?;
        }
        info!("Command queue closed, dispatcher stopping");
        Ok(())
    }

    async fn apply(&self, cmd: Command) -> Result<(), RegistryError> {
        match cmd {
            Command::Join { target } => {
                report(self.session.join(&target).await, "join", &target);
                info!("Joining [{target}]");
            }
            Command::Part { target } => {
                report(self.session.part(&target).await, "part", &target);
                info!("Parting [{target}]");
            }
            Command::SetNick { nick } => {
                report(self.session.set_nick(&nick).await, "nick", &nick);
                info!("Changing nick to [{nick}]");
            }
            Command::Message { target, body } => {
                info!("Sending [{body}] -> [{target}]");
                if !report(self.session.privmsg(&target, &body).await, "msg", &target) {
                    return Ok(());
                }

                let log = match self.registry.resolve(&target) {
                    Ok(log) => log,
                    Err(RegistryError::InvalidName(name)) => {
                        warn!(target_name = %name, "Not logging message to unloggable target");
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                };
                let record = format_message(&timestamp(), &self.session.current_nick(), &body);
                if let Err(e) = log.append(&record) {
                    error!(target_name = %target, error = %e, "Failed to append to transcript");
                }
            }
        }
        Ok(())
    }
}

/// Log a failed session call. Returns whether the call went through.
fn report(result: SessionResult, verb: &str, target: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            error!(verb, target_name = %target, error = %e, "Session rejected command");
            false
        }
    }
}
