//! Inbound event sink.
//!
//! Called from the session reader for every line the server sends. Handlers
//! may run concurrently with the dispatcher; the registry is the only state
//! they share.

use std::sync::Arc;
use tracing::{error, warn};

use crate::error::RegistryError;
use crate::session::{ChatSession, irc_eq};
use crate::state::{RAW_TARGET, TargetRegistry, format_join, format_message, timestamp};

pub struct EventSink {
    registry: Arc<TargetRegistry>,
}

impl EventSink {
    pub fn new(registry: Arc<TargetRegistry>) -> Self {
        Self { registry }
    }

    /// Session established: rejoin every channel we have a transcript for.
    pub async fn on_welcome(&self, session: &dyn ChatSession) {
        for channel in self.registry.channels() {
            if let Err(e) = session.join(&channel).await {
                warn!(channel = %channel, error = %e, "Failed to rejoin channel");
            }
        }
    }

    /// A PRIVMSG. Direct messages (addressed to `own_nick`) are filed under
    /// the sender.
    pub fn on_message(
        &self,
        sender: &str,
        target: &str,
        text: &str,
        own_nick: &str,
    ) -> Result<(), RegistryError> {
        let target = if irc_eq(target, own_nick) { sender } else { target };
        self.append(target, &format_message(&timestamp(), sender, text))
    }

    /// Someone (possibly us) joined `channel`.
    pub fn on_join(&self, who: &str, channel: &str) -> Result<(), RegistryError> {
        self.append(channel, &format_join(&timestamp(), who, channel))
    }

    /// Every inbound protocol line, verbatim.
    pub fn on_raw(&self, line: &str) -> Result<(), RegistryError> {
        self.append(RAW_TARGET, &format!("{line}\n"))
    }

    /// Failing to open a transcript is fatal; a name the server sent that
    /// cannot be a file name is not.
    fn append(&self, target: &str, record: &str) -> Result<(), RegistryError> {
        let log = match self.registry.resolve(target) {
            Ok(log) => log,
            Err(RegistryError::InvalidName(name)) => {
                warn!(target_name = %name, "Ignoring event for unloggable target");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        if let Err(e) = log.append(record) {
            error!(target_name = %target, error = %e, "Failed to append to transcript");
        }
        Ok(())
    }
}
